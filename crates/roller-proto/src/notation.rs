//! Dice-notation parsing.
//!
//! Requests look like `2d20`, `3d6+4`, or `2d20+3|15-`: count, sides, an
//! optional signed modifier, and an optional success threshold.  A trailing
//! `-` after the threshold reverses it (succeed at-or-below instead of
//! at-or-above).

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::records::RollDef;

/// Don't roll more than this many dice at a time.
pub const DICE_COUNT_LIMIT: u32 = 1000;

/// Only dice with these side counts can be rolled.
pub const SUPPORTED_SIDES: [u32; 7] = [2, 4, 6, 8, 10, 12, 20];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error(
        "Your request was not in valid DnD roll syntax. \
         Format your request in the style of 2d20, \
         which rolls two dice with 20 sides each."
    )]
    UnsupportedFormat,
    #[error("Cannot roll dice with {0} sides.")]
    UnsupportedDice(u32),
    #[error("Cannot roll more than {DICE_COUNT_LIMIT} dice.")]
    RequestTooLarge,
}

/// Capture groups: 1 count, 2 sides, 3 modifier, 4 threshold, 5 `+`/`-`
/// after the threshold.
fn roll_matcher() -> &'static Regex {
    static MATCHER: OnceLock<Regex> = OnceLock::new();
    MATCHER.get_or_init(|| {
        Regex::new(r"(\d+)d(\d+)([-+]\d+)?(?:\|(\d+)([-+])?)?").expect("roll regex is valid")
    })
}

pub fn is_supported_sides(sides: u32) -> bool {
    SUPPORTED_SIDES.contains(&sides)
}

/// Parse a dice-notation request into a [`RollDef`].
///
/// When a request is both too large and uses unsupported dice, the
/// unsupported-dice error wins.
pub fn parse_roll(request: &str) -> Result<RollDef, NotationError> {
    let caps = roll_matcher()
        .captures(request)
        .ok_or(NotationError::UnsupportedFormat)?;

    let count: u32 = caps[1]
        .parse()
        .map_err(|_| NotationError::RequestTooLarge)?;
    let sides: u32 = caps[2]
        .parse()
        .map_err(|_| NotationError::UnsupportedDice(u32::MAX))?;
    let modifier: i32 = caps
        .get(3)
        .map(|m| m.as_str().parse())
        .transpose()
        .map_err(|_| NotationError::UnsupportedFormat)?
        .unwrap_or(0);
    let mut success: i32 = caps
        .get(4)
        .map(|m| m.as_str().parse())
        .transpose()
        .map_err(|_| NotationError::UnsupportedFormat)?
        .unwrap_or(0);

    if caps.get(5).map(|m| m.as_str()) == Some("-") {
        success = -success;
    }

    if !is_supported_sides(sides) {
        return Err(NotationError::UnsupportedDice(sides));
    }
    if count > DICE_COUNT_LIMIT {
        return Err(NotationError::RequestTooLarge);
    }

    Ok(RollDef {
        count,
        sides,
        modifier,
        success,
        text: request.to_string(),
    })
}

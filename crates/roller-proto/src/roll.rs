//! Roll execution.

use rand::Rng;

use crate::records::{RollDef, RollResult};

/// Execute a roll definition: roll each die uniformly in `1..=sides`, sum,
/// add the modifier, and judge the total against the success threshold.
pub fn perform_roll(def: &RollDef) -> RollResult {
    let mut rng = rand::thread_rng();
    let mut rolls = Vec::with_capacity(def.count as usize);
    let mut total: i32 = 0;

    for _ in 0..def.count {
        let one_roll = rng.gen_range(1..=def.sides);
        rolls.push(one_roll);
        total += one_roll as i32;
    }

    let total = total + def.modifier;

    RollResult {
        rolls,
        total,
        succeeded: judge(total, def.success),
    }
}

/// 1 = success, -1 = failure, 0 = no threshold given.
/// A negative threshold is reversed: succeed when the total is at or below
/// its absolute value.
fn judge(total: i32, success: i32) -> i32 {
    use std::cmp::Ordering;
    match success.cmp(&0) {
        Ordering::Equal => 0,
        Ordering::Greater => {
            if total >= success {
                1
            } else {
                -1
            }
        }
        Ordering::Less => {
            if total <= -success {
                1
            } else {
                -1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(count: u32, sides: u32, modifier: i32, success: i32) -> RollDef {
        RollDef {
            count,
            sides,
            modifier,
            success,
            text: String::new(),
        }
    }

    #[test]
    fn test_rolls_stay_in_range() {
        let result = perform_roll(&def(100, 6, 0, 0));
        assert_eq!(result.rolls.len(), 100);
        assert!(result.rolls.iter().all(|&r| (1..=6).contains(&r)));
        assert_eq!(
            result.total,
            result.rolls.iter().sum::<u32>() as i32
        );
    }

    #[test]
    fn test_modifier_applies_to_total() {
        let result = perform_roll(&def(1, 2, 10, 0));
        assert!((11..=12).contains(&result.total));
    }

    #[test]
    fn test_no_threshold_means_neutral() {
        let result = perform_roll(&def(3, 4, 0, 0));
        assert_eq!(result.succeeded, 0);
    }

    #[test]
    fn test_threshold_judgment() {
        // 1d2+10 totals 11 or 12: always >= 5, never >= 20.
        assert_eq!(perform_roll(&def(1, 2, 10, 5)).succeeded, 1);
        assert_eq!(perform_roll(&def(1, 2, 10, 20)).succeeded, -1);
    }

    #[test]
    fn test_reversed_threshold_judgment() {
        // Reversed: succeed when total <= |threshold|.
        assert_eq!(perform_roll(&def(1, 2, 10, -20)).succeeded, 1);
        assert_eq!(perform_roll(&def(1, 2, 10, -5)).succeeded, -1);
    }

    #[test]
    fn test_zero_dice_rolls_nothing() {
        let result = perform_roll(&def(0, 6, 2, 0));
        assert!(result.rolls.is_empty());
        assert_eq!(result.total, 2);
    }
}

//! Display formatting for roll records.
//!
//! Pure helpers consumed by the rendering layer; the daemon and TUI share
//! them so labels stay consistent everywhere.

/// Full judgment label for a `succeeded` value.
pub fn success_label(succeeded: i32) -> &'static str {
    if succeeded > 0 {
        "SUCCESS"
    } else if succeeded < 0 {
        "FAILURE"
    } else {
        "RESULT"
    }
}

/// Short judgment label for tight layouts.
pub fn success_short(succeeded: i32) -> &'static str {
    if succeeded > 0 {
        "SUC"
    } else if succeeded < 0 {
        "FAIL"
    } else {
        "RES"
    }
}

/// Format a modifier, forcing a leading `+` for non-negative values.
pub fn format_modifier(modifier: i32) -> String {
    if modifier < 0 {
        modifier.to_string()
    } else {
        format!("+{}", modifier)
    }
}

/// Format a success threshold with its direction after the number
/// (`15+`, `8-`), or `∅` when no threshold is set.
pub fn format_success(success: i32) -> String {
    use std::cmp::Ordering;
    match success.cmp(&0) {
        Ordering::Greater => format!("{}+", success),
        Ordering::Less => format!("{}-", -success),
        Ordering::Equal => "∅".to_string(),
    }
}

//! Shared types and core logic for ddroller.
//!
//! Everything the daemon and the TUI have in common lives here: the roll
//! record wire types, dice-notation parsing, roll execution, slug and label
//! formatting, the client-side feed (merge + watermark) core, and config.

pub mod config;
pub mod feed;
pub mod fmt;
pub mod notation;
pub mod platform;
pub mod records;
pub mod roll;
pub mod slug;

//! AppState — shared read-only data passed to all components during render
//! and key handling.
//!
//! Components read this but never mutate it.  The App event-loop is the
//! only thing that writes to AppState.

use roller_proto::config::Config;
use roller_proto::feed::RollFeed;

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    /// The bounded, sorted, live view of the roll log plus its watermark.
    pub feed: RollFeed,
    /// True while the last poll succeeded (even when it returned nothing).
    pub connected: bool,
    /// Message from the last failed poll, cleared on the next success.
    pub last_poll_error: Option<String>,
    /// A submitted roll is waiting for the daemon's response.
    pub submit_in_flight: bool,

    pub user: String,
    pub base_url: String,
    pub poll_interval_ms: u64,

    /// Recent app events (connection changes, rolls, rejections).
    pub logs: Vec<String>,
    pub input_mode: InputMode,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            feed: RollFeed::new(config.feed.page_size),
            connected: false,
            last_poll_error: None,
            submit_in_flight: false,
            user: config.client.user.clone(),
            base_url: config.client.base_url.clone(),
            poll_interval_ms: config.feed.poll_interval_ms,
            logs: Vec::new(),
            input_mode: InputMode::Normal,
        }
    }
}

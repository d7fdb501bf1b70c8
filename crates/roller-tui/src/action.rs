//! Action enum — user intents produced by components, dispatched by the App.

#[derive(Debug, Clone)]
pub enum Action {
    /// Open the dice-notation prompt.
    OpenPrompt,
    /// Close the prompt without rolling.
    ClosePrompt,
    /// Submit a validated dice-notation request to the daemon.
    SubmitRoll(String),
    /// Expand/collapse the log panel.
    ToggleLogs,
    Quit,
}

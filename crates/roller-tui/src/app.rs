//! App — owns all state and runs the event loop.
//!
//! One tokio select loop drives everything: terminal key events (read on a
//! blocking task), the repeating poll timer, and responses from spawned
//! fetch/submit tasks.  The poll timer reads the feed's watermark at each
//! firing, so every request asks only for records newer than what is already
//! displayed.  In-flight polls are not serialized; responses are merged in
//! completion order, which the feed tolerates (merge is order-insensitive
//! and the watermark only moves forward).

use std::io;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info};

use roller_proto::config::Config;
use roller_proto::fmt::success_short;
use roller_proto::records::RollRecord;

use crate::action::Action;
use crate::app_state::AppState;
use crate::component::Component;
use crate::components::{log_panel::LogPanel, roll_list::RollList, roll_prompt::RollPrompt};
use crate::http::{PollOutcome, RollClient};
use crate::widgets::status_bar::{self, InputMode};

/// Everything the select loop can wake up on.
pub enum AppMessage {
    Event(Event),
    Poll(PollOutcome),
    Submitted(RollRecord),
    SubmitFailed(String),
}

pub struct App {
    state: AppState,
    client: RollClient,

    roll_list: RollList,
    roll_prompt: RollPrompt,
    log_panel: LogPanel,

    should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            state: AppState::new(config),
            client: RollClient::new(&config.client.base_url, &config.client.user),
            roll_list: RollList::new(),
            roll_prompt: RollPrompt::new(),
            log_panel: LogPanel::new(),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Poll timer ────────────────────────────────────────────────────────
        // The first tick fires immediately, which doubles as the initial
        // full-page fetch (no watermark yet).
        let mut poll_tick =
            tokio::time::interval(Duration::from_millis(self.state.poll_interval_ms));
        poll_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            "polling {} every {} ms",
            self.state.base_url, self.state.poll_interval_ms
        );
        self.push_log(format!("polling {}", self.state.base_url));

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg, &tx);
                }

                _ = poll_tick.tick() => {
                    let client = self.client.clone();
                    let watermark = self.state.feed.watermark();
                    let poll_tx = tx.clone();
                    tokio::spawn(async move {
                        let outcome = client.poll_since(watermark).await;
                        let _ = poll_tx.send(AppMessage::Poll(outcome)).await;
                    });
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    /// Returns `true` when the message requires a redraw.
    fn handle_message(&mut self, msg: AppMessage, tx: &mpsc::Sender<AppMessage>) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    let actions = self.handle_key(key);
                    for action in actions {
                        self.dispatch(action, tx);
                    }
                    true
                }
                Event::Resize(..) => true,
                _ => false,
            },

            AppMessage::Poll(outcome) => self.on_poll(outcome),

            AppMessage::Submitted(record) => {
                self.state.submit_in_flight = false;
                self.push_log(format!(
                    "{} rolled {} → {} {}",
                    record.slug(),
                    record.request.text,
                    record.result.total,
                    success_short(record.result.succeeded)
                ));
                // A confirmed server response carrying a record: feed it
                // through the same merge path as a poll batch.  The watermark
                // advances past it, so the next poll won't re-fetch it.
                self.state.feed.apply(vec![record]);
                true
            }

            AppMessage::SubmitFailed(message) => {
                self.state.submit_in_flight = false;
                self.push_log(format!("roll rejected: {}", message));
                true
            }
        }
    }

    /// Incorporate one poll cycle.  Failures and empty responses skip the
    /// merge/advance step entirely — try again next tick.
    fn on_poll(&mut self, outcome: PollOutcome) -> bool {
        match outcome {
            PollOutcome::Records(records) => {
                debug!("poll: {} new records", records.len());
                if !self.state.connected {
                    self.push_log("connected".to_string());
                }
                self.state.connected = true;
                self.state.last_poll_error = None;
                self.state.feed.apply(records);
                true
            }
            PollOutcome::Empty => {
                let was_connected = self.state.connected;
                if !was_connected {
                    self.push_log("connected".to_string());
                }
                self.state.connected = true;
                self.state.last_poll_error = None;
                !was_connected
            }
            PollOutcome::Failed(message) => {
                debug!("poll failed: {}", message);
                let was_connected = self.state.connected || self.state.last_poll_error.is_none();
                if self.state.connected {
                    self.push_log("daemon unreachable — still polling".to_string());
                }
                self.state.connected = false;
                self.state.last_poll_error = Some(message);
                was_connected
            }
        }
    }

    // ── Key routing ───────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // Ctrl+C always quits, regardless of mode.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        if self.state.input_mode == InputMode::Prompt {
            return self.roll_prompt.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
            KeyCode::Char('r') | KeyCode::Char('/') => vec![Action::OpenPrompt],
            KeyCode::Char('L') => vec![Action::ToggleLogs],
            KeyCode::PageUp | KeyCode::PageDown if self.log_panel.expanded => {
                self.log_panel.handle_key(key, &self.state)
            }
            _ => self.roll_list.handle_key(key, &self.state),
        }
    }

    fn dispatch(&mut self, action: Action, tx: &mpsc::Sender<AppMessage>) {
        match action {
            Action::Quit => self.should_quit = true,

            Action::OpenPrompt => {
                self.state.input_mode = InputMode::Prompt;
            }

            Action::ClosePrompt => {
                self.roll_prompt.clear();
                self.state.input_mode = InputMode::Normal;
            }

            Action::SubmitRoll(request) => {
                self.state.input_mode = InputMode::Normal;
                self.state.submit_in_flight = true;
                let client = self.client.clone();
                let submit_tx = tx.clone();
                tokio::spawn(async move {
                    let msg = match client.submit_roll(&request).await {
                        Ok(record) => AppMessage::Submitted(record),
                        Err(e) => AppMessage::SubmitFailed(e.to_string()),
                    };
                    let _ = submit_tx.send(msg).await;
                });
            }

            Action::ToggleLogs => self.log_panel.toggle(),
        }
    }

    fn push_log(&mut self, message: String) {
        self.state.logs.push(message);
        // Keep a generous tail; the panel only ever shows the end.
        if self.state.logs.len() > 500 {
            self.state.logs.drain(..100);
        }
    }

    // ── Layout + render ───────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let prompt_open = self.state.input_mode == InputMode::Prompt;
        let log_height = if self.log_panel.expanded { 8 } else { 1 };

        let mut constraints = vec![Constraint::Min(5), Constraint::Length(log_height)];
        if prompt_open {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(frame.area());

        self.roll_list
            .draw(frame, chunks[0], !prompt_open, &self.state);
        self.log_panel.draw(frame, chunks[1], false, &self.state);
        if prompt_open {
            self.roll_prompt.draw(frame, chunks[2], true, &self.state);
        }
        status_bar::draw_keys_bar(frame, chunks[chunks.len() - 1], &self.state);
    }
}

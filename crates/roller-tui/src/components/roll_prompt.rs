//! RollPrompt — single-line dice-notation input.
//!
//! Validates locally with the shared parser before anything is sent, so bad
//! notation never leaves the client.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use roller_proto::notation::parse_roll;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{style_prompt, C_FAILURE, C_MUTED},
};

pub struct RollPrompt {
    input: Input,
    error: Option<String>,
}

impl RollPrompt {
    pub fn new() -> Self {
        Self {
            input: Input::default(),
            error: None,
        }
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
        self.error = None;
    }
}

impl Component for RollPrompt {
    /// Esc behaviour mirrors the rest of the UI's inputs: first Esc clears
    /// the text, second Esc closes the prompt.
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    self.input = Input::default();
                    self.error = None;
                    vec![]
                } else {
                    vec![Action::ClosePrompt]
                }
            }
            KeyCode::Enter => {
                let request = self.input.value().trim().to_string();
                if request.is_empty() {
                    return vec![Action::ClosePrompt];
                }
                match parse_roll(&request) {
                    Ok(_) => {
                        self.clear();
                        vec![Action::SubmitRoll(request)]
                    }
                    Err(e) => {
                        self.error = Some(e.to_string());
                        vec![]
                    }
                }
            }
            _ => {
                self.error = None;
                self.input
                    .handle_event(&ratatui::crossterm::event::Event::Key(key));
                vec![]
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(8) as usize);
        let value = self.input.value();

        let mut spans = vec![Span::styled("roll ▸ ", Style::default().fg(C_MUTED))];
        if value.is_empty() {
            spans.push(Span::styled("2d20+3|15", Style::default().fg(C_MUTED)));
        } else {
            spans.push(Span::raw(value[scroll..].to_string()));
        }
        if let Some(err) = &self.error {
            spans.push(Span::styled(
                format!("  ✗ {}", err.lines().next().unwrap_or(err)),
                Style::default().fg(C_FAILURE),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).style(style_prompt());
        frame.render_widget(paragraph, area);

        if !value.is_empty() {
            let cursor_x = area.x + 7 + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

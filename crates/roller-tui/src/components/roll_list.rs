//! RollList component — the live feed of recent rolls.
//!
//! Renders the feed's bounded window newest-first.  Selection is local UI
//! state; the record list itself lives in `AppState::feed` and is only
//! rewritten by the App when a poll merges new records.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use roller_proto::fmt::{format_modifier, format_success, success_label};
use roller_proto::records::RollRecord;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{
        self, style_muted, style_selected, style_selected_focused, C_BADGE_ERR, C_BADGE_LIVE,
        C_MUTED, C_PRIMARY, C_SECONDARY, C_SLUG, C_USER,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct RollList {
    selected: usize,
    scroll_offset: usize,
}

impl RollList {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
        }
    }

    fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height - 1);
        }
    }
}

impl Component for RollList {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        let len = state.feed.len();
        if len == 0 {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(len - 1);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                self.scroll_offset = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = len - 1;
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = if state.connected {
            Badge {
                text: "LIVE",
                color: C_BADGE_LIVE,
            }
        } else {
            Badge {
                text: "ERR",
                color: C_BADGE_ERR,
            }
        };
        let block = pane_chrome("rolls", focused, Some(badge));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.feed.is_empty() {
            let hint = if state.connected {
                "  no rolls yet — press r to roll"
            } else {
                "  waiting for daemon…"
            };
            frame.render_widget(Paragraph::new(Span::styled(hint, style_muted())), inner);
            return;
        }

        let records = state.feed.records();
        // The feed can shrink only to the page size; still clamp after merges.
        if self.selected >= records.len() {
            self.selected = records.len() - 1;
        }
        let height = inner.height as usize;
        self.ensure_visible(height);

        let lines: Vec<Line> = records
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
            .map(|(i, record)| {
                let mut line = record_line(record);
                if i == self.selected {
                    line = line.style(if focused {
                        style_selected_focused()
                    } else {
                        style_selected()
                    });
                }
                line
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// One feed row:
/// ` 0001  12:03  alice     2d20+3|15+   11+7 +3          = 21  SUCCESS`
fn record_line(record: &RollRecord) -> Line<'static> {
    let dice: String = record
        .result
        .rolls
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("+");

    let mut request = record.request.text.clone();
    if record.request.success != 0 {
        // Show the threshold with its direction, not the raw request tail.
        request = format!(
            "{}d{}{}|{}",
            record.request.count,
            record.request.sides,
            format_modifier(record.request.modifier),
            format_success(record.request.success)
        );
    }

    Line::from(vec![
        Span::styled(format!(" {}  ", record.slug()), theme::style_default().fg(C_SLUG)),
        Span::styled(
            format!("{}  ", record.time),
            theme::style_default().fg(C_MUTED),
        ),
        Span::styled(
            format!("{}  ", pad(&record.user, 10)),
            theme::style_default().fg(C_USER),
        ),
        Span::styled(
            format!("{}  ", pad(&request, 14)),
            theme::style_default().fg(C_PRIMARY),
        ),
        Span::styled(
            format!("{}  ", pad(&truncate(&dice, 24), 24)),
            theme::style_default().fg(C_SECONDARY),
        ),
        Span::styled(
            format!("= {:<4} ", record.result.total),
            theme::style_default().fg(C_PRIMARY),
        ),
        Span::styled(
            success_label(record.result.succeeded).to_string(),
            theme::style_outcome(record.result.succeeded),
        ),
    ])
}

/// Pad to `width` display columns (wide characters count double).
fn pad(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    if current >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - current))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = UnicodeWidthStr::width(ch.to_string().as_str());
        if width + w > max.saturating_sub(1) {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

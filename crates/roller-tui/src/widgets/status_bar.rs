//! Status bar — bottom line with mode, connection state, watermark, and keys.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::AppState;
use crate::theme::{
    C_ACCENT, C_MODE_NORMAL, C_MODE_PROMPT, C_MUTED, C_SECONDARY, C_SUCCESS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Prompt,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Prompt => "ROLL",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Prompt => C_MODE_PROMPT,
        }
    }
}

pub fn draw_keys_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let mode = state.input_mode;

    let conn_span = if state.connected {
        Span::styled("●", Style::default().fg(C_SUCCESS))
    } else {
        Span::styled("○", Style::default().fg(C_ACCENT))
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default()
                .fg(mode.color())
                .add_modifier(Modifier::BOLD),
        ),
        conn_span,
        Span::styled(
            format!(" {}  ", state.base_url),
            Style::default().fg(C_SECONDARY),
        ),
        Span::styled(
            format!("seq {}  ", state.feed.watermark()),
            Style::default().fg(C_SECONDARY),
        ),
        Span::styled(
            format!("{}  ", state.user),
            Style::default().fg(C_SECONDARY),
        ),
    ];

    if state.submit_in_flight {
        spans.push(Span::styled("rolling… ", Style::default().fg(C_MODE_PROMPT)));
    }

    let keys = match mode {
        InputMode::Normal => " r roll  ↑↓/jk move  L logs  q quit",
        InputMode::Prompt => " type notation (e.g. 2d20+3|15)  Enter roll  Esc cancel",
    };
    spans.push(Span::styled(keys, Style::default().fg(C_MUTED)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

//! Component trait — the interface every UI panel implements.
//!
//! Components are self-contained: they own their scroll/input state and
//! render themselves from the shared read-only `AppState`.  They never
//! mutate shared state directly — they return `Vec<Action>` and the App
//! event-loop dispatches those.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::app_state::AppState;

pub trait Component {
    /// Handle a key event routed to this component.  Returns actions to be
    /// dispatched.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}

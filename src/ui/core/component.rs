use super::actions::Action;
use crossterm::event::{Event, KeyEvent};
use ratatui::{layout::Rect, Frame};

pub trait Component {
    fn handle_events(&mut self, event: Option<Event>) -> Action {
        if let Some(Event::Key(key)) = event {
            self.handle_key_events(key)
        } else {
            Action::None
        }
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Action;

    /// Apply a completion action; may return a follow-up action
    fn update(&mut self, action: Action) -> Action {
        // Default implementation passes action through
        action
    }

    /// Draw the current view state. Must not mutate anything observable.
    fn render(&mut self, f: &mut Frame, rect: Rect);
}

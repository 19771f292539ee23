use crossterm::event::{Event, KeyEvent, MouseEvent};

/// A terminal event, delivered through
/// [`terminal_events`](crate::subscriptions::terminal_events).
///
/// Payloads are crossterm's own types, so key codes and modifiers can be
/// matched with the full crossterm API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// New size as (columns, rows).
    Resize(u16, u16),
    FocusGained,
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl From<Event> for TerminalEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(k) => TerminalEvent::Key(k),
            Event::Mouse(m) => TerminalEvent::Mouse(m),
            Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            Event::FocusGained => TerminalEvent::FocusGained,
            Event::FocusLost => TerminalEvent::FocusLost,
            Event::Paste(s) => TerminalEvent::Paste(s),
        }
    }
}

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Application events
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// No input within the tick rate; used to expire notifications
    Tick,
}

/// Poll for terminal input, emitting a tick when none arrives in `tick_rate`.
pub fn poll_event(tick_rate: Duration) -> color_eyre::Result<Option<AppEvent>> {
    if event::poll(tick_rate)? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(AppEvent::Key(key))),
            _ => Ok(None),
        }
    } else {
        Ok(Some(AppEvent::Tick))
    }
}

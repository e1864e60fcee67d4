//! Terminal input, read with a timeout.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Resize,
    /// The wait timed out with no input.
    Tick,
}

/// Block for at most `timeout` waiting for the next event the app cares about.
///
/// Key releases and events the app ignores (mouse, focus, paste) are
/// skipped and count against the same timeout.
pub fn next_event(timeout: Duration) -> io::Result<AppEvent> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !event::poll(remaining)? {
            return Ok(AppEvent::Tick);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                return Ok(AppEvent::Input(key));
            }
            Event::Resize(_, _) => return Ok(AppEvent::Resize),
            _ => {}
        }
    }
}

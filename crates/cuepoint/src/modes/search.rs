//! Search entry: collects a pattern and searches the queue on Enter.

use crossterm::event::{KeyCode, KeyEvent};

use crate::keymap::{matches_chord, KeyChord, Keymap};
use crate::session::Session;

use super::line::LineBuffer;
use super::{typed_char, ModeHandler};

const PROMPT: char = '/';

pub struct SearchHandler {
    trigger: KeyChord,
    escape: KeyChord,
    line: LineBuffer,
}

impl SearchHandler {
    pub fn new(keymap: &Keymap) -> Self {
        Self {
            trigger: keymap.search.clone(),
            escape: keymap.escape.clone(),
            line: LineBuffer::default(),
        }
    }
}

impl ModeHandler for SearchHandler {
    fn initialise(&mut self, event: &KeyEvent, session: &mut Session) {
        self.line.begin(event, PROMPT);
        session.services.status.clear();
    }

    fn finalise(&mut self, _event: &KeyEvent, _session: &mut Session) {
        self.line.clear();
    }

    fn handle(&mut self, event: &KeyEvent, session: &mut Session) -> bool {
        if matches_chord(event, &self.escape) {
            self.line.clear();
            return true;
        }
        match event.code {
            KeyCode::Enter => {
                let query = self.line.take_text();
                if !query.trim().is_empty() {
                    let result = session.execute("search", &query);
                    session.services.report(result);
                }
                true
            }
            KeyCode::Backspace => {
                self.line.backspace();
                true
            }
            _ => match typed_char(event) {
                Some(ch) => {
                    self.line.push(ch);
                    true
                }
                None => false,
            },
        }
    }

    fn refresh(&self, session: &mut Session) {
        session.services.mode_line = Some(self.line.as_str().to_string());
    }

    fn causes_mode_to_start(&self, event: &KeyEvent) -> bool {
        matches_chord(event, &self.trigger)
    }

    fn causes_mode_to_end(&self, event: &KeyEvent) -> bool {
        event.code == KeyCode::Enter || (event.code == KeyCode::Backspace && self.line.is_empty())
    }

    fn seed(&mut self, initial: &str, _session: &mut Session) {
        self.line.push_str(initial);
    }
}

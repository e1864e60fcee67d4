//! Command entry: builds an ex command line and runs it on Enter.

use crossterm::event::{KeyCode, KeyEvent};

use crate::keymap::{matches_chord, KeyChord, Keymap};
use crate::session::Session;

use super::line::LineBuffer;
use super::{typed_char, ModeHandler};

const PROMPT: char = ':';

pub struct CommandHandler {
    trigger: KeyChord,
    complete: KeyChord,
    escape: KeyChord,
    line: LineBuffer,
}

impl CommandHandler {
    pub fn new(keymap: &Keymap) -> Self {
        Self {
            trigger: keymap.command.clone(),
            complete: keymap.complete.clone(),
            escape: keymap.escape.clone(),
            line: LineBuffer::default(),
        }
    }

    fn complete_name(&mut self, session: &mut Session) {
        let typed = self.line.text();
        // Only the command name is completed.
        if typed.contains(char::is_whitespace) {
            return;
        }
        let completed = session.interpreter.tab_complete(typed);
        self.line.replace_text(&completed);
    }
}

impl ModeHandler for CommandHandler {
    fn initialise(&mut self, event: &KeyEvent, session: &mut Session) {
        self.line.begin(event, PROMPT);
        session.interpreter.reset_tab_completion();
        session.services.status.clear();
    }

    fn finalise(&mut self, _event: &KeyEvent, session: &mut Session) {
        self.line.clear();
        session.interpreter.reset_tab_completion();
    }

    fn handle(&mut self, event: &KeyEvent, session: &mut Session) -> bool {
        if !matches_chord(event, &self.complete) {
            session.interpreter.reset_tab_completion();
        }

        if matches_chord(event, &self.escape) {
            self.line.clear();
            return true;
        }
        if matches_chord(event, &self.complete) {
            self.complete_name(session);
            return true;
        }

        match event.code {
            KeyCode::Enter => {
                let input = self.line.take_text();
                tracing::debug!(line = %input, "command entered");
                let result = session.execute_line(&input);
                session.services.report(result);
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

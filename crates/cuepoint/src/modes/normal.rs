//! Normal mode: single chords run bound commands.
//!
//! Its start rule is the escape chord, which the registry checks first in
//! every other mode, so escape always returns here.

use crossterm::event::KeyEvent;

use crate::commands::split_command;
use crate::keymap::{matches_chord, Binding, Keymap};
use crate::session::{PromptRequest, Session};

use super::ModeHandler;

pub struct NormalHandler {
    keymap: Keymap,
}

impl NormalHandler {
    pub fn new(keymap: &Keymap) -> Self {
        Self {
            keymap: keymap.clone(),
        }
    }
}

impl ModeHandler for NormalHandler {
    fn initialise(&mut self, _event: &KeyEvent, session: &mut Session) {
        session.services.mode_line = None;
    }

    fn finalise(&mut self, _event: &KeyEvent, _session: &mut Session) {}

    fn handle(&mut self, event: &KeyEvent, session: &mut Session) -> bool {
        let Some(binding) = self.keymap.binding_for(event) else {
            return false;
        };
        match binding {
            Binding::Command(line) => {
                let (name, args) = split_command(line);
                let result = session.execute(&name, &args);
                session.services.report(result);
            }
            Binding::Prompt(initial) => {
                session.services.prompt = Some(PromptRequest {
                    trigger: self.keymap.command.to_key_event(),
                    initial: initial.clone(),
                });
            }
        }
        true
    }

    fn refresh(&self, session: &mut Session) {
        session.services.mode_line = None;
    }

    fn causes_mode_to_start(&self, event: &KeyEvent) -> bool {
        matches_chord(event, &self.keymap.escape)
    }

    fn causes_mode_to_end(&self, _event: &KeyEvent) -> bool {
        false
    }
}

//! Modal input handling.
//!
//! Every keystroke goes to the handler of the active mode first; the
//! registry then decides whether the same keystroke moves input to another
//! mode. Handlers are owned by the registry, one per `Mode` value.
//!
//! Submodules:
//! - line: the prompt-prefixed edit buffer shared by command and search entry
//! - normal: single-key bindings and the escape rule
//! - command: ex command entry
//! - search: queue search entry

mod command;
mod line;
mod normal;
mod search;

use std::collections::BTreeMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::keymap::Keymap;
use crate::session::Session;

pub use command::CommandHandler;
pub use normal::NormalHandler;
pub use search::SearchHandler;

/// Input modes, in the order used to break ties between start rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    Normal,
    Command,
    Search,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::Command, Mode::Search];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::Normal => "NORMAL",
            Mode::Command => "COMMAND",
            Mode::Search => "SEARCH",
        };
        f.write_str(label)
    }
}

/// Behaviour of one input mode.
///
/// `causes_mode_to_start` and `causes_mode_to_end` are predicates only;
/// all state changes happen in the other hooks.
pub trait ModeHandler {
    fn initialise(&mut self, event: &KeyEvent, session: &mut Session);
    fn finalise(&mut self, event: &KeyEvent, session: &mut Session);
    /// Returns whether the event was consumed.
    fn handle(&mut self, event: &KeyEvent, session: &mut Session) -> bool;
    fn refresh(&self, session: &mut Session);
    fn causes_mode_to_start(&self, event: &KeyEvent) -> bool;
    fn causes_mode_to_end(&self, event: &KeyEvent) -> bool;

    /// Pre-fill the input buffer right after `initialise`.
    fn seed(&mut self, _initial: &str, _session: &mut Session) {}
}

pub struct ModeRegistry {
    handlers: BTreeMap<Mode, Box<dyn ModeHandler>>,
    active: Mode,
}

impl ModeRegistry {
    /// Build a registry from explicit handlers.
    ///
    /// # Panics
    ///
    /// Panics if any `Mode` lacks a handler. This is a construction bug and
    /// input would otherwise be dropped silently.
    pub fn new(handlers: BTreeMap<Mode, Box<dyn ModeHandler>>) -> Self {
        for mode in Mode::ALL {
            if !handlers.contains_key(&mode) {
                missing_handler(mode);
            }
        }
        Self {
            handlers,
            active: Mode::Normal,
        }
    }

    /// Registry with the stock handlers bound to `keymap`.
    pub fn from_keymap(keymap: &Keymap) -> Self {
        let mut handlers: BTreeMap<Mode, Box<dyn ModeHandler>> = BTreeMap::new();
        handlers.insert(Mode::Normal, Box::new(NormalHandler::new(keymap)));
        handlers.insert(Mode::Command, Box::new(CommandHandler::new(keymap)));
        handlers.insert(Mode::Search, Box::new(SearchHandler::new(keymap)));
        Self::new(handlers)
    }

    pub fn active(&self) -> Mode {
        self.active
    }

    /// Bring up the initial mode before the first keystroke.
    pub fn start(&mut self, session: &mut Session) {
        let event = KeyEvent::new(KeyCode::Null, KeyModifiers::NONE);
        let mode = self.active;
        self.handler_mut(mode).initialise(&event, session);
        self.refresh(session);
    }

    /// The mode input should be in after `event` arrives while in `mode`.
    /// Reads handler predicates only.
    pub fn mode_after_input(&self, mode: Mode, event: &KeyEvent) -> Mode {
        let current = mode;
        if current != Mode::Normal {
            if self.handler(Mode::Normal).causes_mode_to_start(event)
                || self.handler(current).causes_mode_to_end(event)
            {
                return Mode::Normal;
            }
            return current;
        }

        // Last match wins; iteration follows `Mode` declaration order.
        let mut next = current;
        for (mode, handler) in &self.handlers {
            if handler.causes_mode_to_start(event) {
                next = *mode;
            }
        }
        next
    }

    /// Route `event` to the active handler, then apply any transition.
    pub fn dispatch(&mut self, event: &KeyEvent, session: &mut Session) -> bool {
        let mode = self.active;
        let handled = self.handler_mut(mode).handle(event, session);
        self.change_mode(event, session);

        if let Some(prompt) = session.services.prompt.take() {
            self.change_mode_with(&prompt.trigger, &prompt.initial, session);
        }
        self.refresh(session);
        handled
    }

    /// Apply the transition `event` causes, if any. Returns whether the mode changed.
    pub fn change_mode(&mut self, event: &KeyEvent, session: &mut Session) -> bool {
        let next = self.mode_after_input(self.active, event);
        if next == self.active {
            return false;
        }
        let previous = self.active;
        self.handler_mut(previous).finalise(event, session);
        self.active = next;
        self.handler_mut(next).initialise(event, session);
        tracing::debug!(from = %previous, to = %next, "mode change");
        true
    }

    /// Like `change_mode`, then pre-fill the incoming mode's buffer.
    pub fn change_mode_with(
        &mut self,
        event: &KeyEvent,
        initial: &str,
        session: &mut Session,
    ) -> bool {
        if !self.change_mode(event, session) {
            return false;
        }
        let mode = self.active;
        self.handler_mut(mode).seed(initial, session);
        true
    }

    pub fn refresh(&self, session: &mut Session) {
        self.handler(self.active).refresh(session);
    }

    fn handler(&self, mode: Mode) -> &dyn ModeHandler {
        match self.handlers.get(&mode) {
            Some(handler) => &**handler,
            None => missing_handler(mode),
        }
    }

    fn handler_mut(&mut self, mode: Mode) -> &mut dyn ModeHandler {
        match self.handlers.get_mut(&mode) {
            Some(handler) => &mut **handler,
            None => missing_handler(mode),
        }
    }
}

fn missing_handler(mode: Mode) -> ! {
    panic!("mode registry has no handler for {mode:?} mode")
}

/// Printable text input: a character with at most shift held.
pub(crate) fn typed_char(event: &KeyEvent) -> Option<char> {
    match event.code {
        KeyCode::Char(ch)
            if !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
                && !ch.is_control() =>
        {
            Some(ch)
        }
        _ => None,
    }
}

//! Key chord parsing and matching.
//!
//! Parses key chord strings like ":" or "ctrl+p" from config
//! and matches them against crossterm KeyEvents at runtime.
//!
//! Used for the mode triggers and the Normal mode bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::KeymapConfig;

/// What a Normal mode chord does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Run the ex command line immediately.
    Command(String),
    /// Open command entry with this text already typed.
    Prompt(String),
}

impl Binding {
    fn from_config(line: &str) -> Self {
        match line.strip_prefix(':') {
            Some(rest) => Binding::Prompt(rest.to_string()),
            None => Binding::Command(line.trim().to_string()),
        }
    }
}

/// Parsed keymap used by the mode handlers.
#[derive(Debug, Clone)]
pub struct Keymap {
    pub command: KeyChord,
    pub search: KeyChord,
    pub complete: KeyChord,
    pub escape: KeyChord,
    pub normal: Vec<(KeyChord, Binding)>,
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Self {
        let normal = config
            .normal
            .iter()
            .filter_map(|(chord, line)| match parse_key_chord(chord) {
                Some(parsed) => Some((parsed, Binding::from_config(line))),
                None => {
                    tracing::warn!(chord = %chord, "ignoring unparseable normal mode binding");
                    None
                }
            })
            .collect();
        Self {
            command: chord_or(&config.command, KeyCode::Char(':')),
            search: chord_or(&config.search, KeyCode::Char('/')),
            complete: chord_or(&config.complete, KeyCode::Tab),
            escape: chord_or(&config.escape, KeyCode::Esc),
            normal,
        }
    }

    pub fn binding_for(&self, event: &KeyEvent) -> Option<&Binding> {
        self.normal
            .iter()
            .find(|(chord, _)| matches_chord(event, chord))
            .map(|(_, binding)| binding)
    }
}

fn chord_or(input: &str, fallback: KeyCode) -> KeyChord {
    parse_key_chord(input).unwrap_or_else(|| {
        tracing::warn!(chord = input, "invalid key chord, using default");
        KeyChord::plain(fallback)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn plain(key: KeyCode) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }

    /// Synthesize the key event this chord matches.
    pub fn to_key_event(&self) -> KeyEvent {
        let mut modifiers = KeyModifiers::NONE;
        if self.ctrl {
            modifiers |= KeyModifiers::CONTROL;
        }
        if self.alt {
            modifiers |= KeyModifiers::ALT;
        }
        if self.shift {
            modifiers |= KeyModifiers::SHIFT;
        }
        if self.meta {
            modifiers |= KeyModifiers::SUPER;
        }
        KeyEvent::new(self.key, modifiers)
    }
}

pub fn parse_key_chord(input: &str) -> Option<KeyChord> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    // A lone "+" is a key, not a separator.
    if trimmed == "+" {
        return Some(KeyChord::plain(KeyCode::Char('+')));
    }

    let parts: Vec<&str> = trimmed
        .split('+')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }

    let mut chord = KeyChord::plain(KeyCode::Null);

    for part in parts {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => chord.ctrl = true,
            "alt" | "option" => chord.alt = true,
            "shift" => chord.shift = true,
            "meta" | "cmd" | "super" => chord.meta = true,
            _ => {
                if chord.key != KeyCode::Null {
                    return None;
                }
                chord.key = parse_key(part)?;
            }
        }
    }

    if chord.key == KeyCode::Null {
        return None;
    }

    Some(chord)
}

fn parse_key(key: &str) -> Option<KeyCode> {
    match key.to_lowercase().as_str() {
        "esc" | "escape" => return Some(KeyCode::Esc),
        "enter" | "return" | "cr" => return Some(KeyCode::Enter),
        "tab" => return Some(KeyCode::Tab),
        "backspace" | "bs" => return Some(KeyCode::Backspace),
        "space" | "spacebar" => return Some(KeyCode::Char(' ')),
        "up" => return Some(KeyCode::Up),
        "down" => return Some(KeyCode::Down),
        "left" => return Some(KeyCode::Left),
        "right" => return Some(KeyCode::Right),
        _ => {}
    }
    // Single characters keep their case so "n" and "N" stay distinct.
    let mut chars = key.chars();
    let first = chars.next()?;
    if chars.next().is_none() {
        Some(KeyCode::Char(first))
    } else {
        None
    }
}

pub fn matches_chord(event: &KeyEvent, chord: &KeyChord) -> bool {
    if event.code != chord.key {
        return false;
    }

    let modifiers = event.modifiers;
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    let meta = modifiers.contains(KeyModifiers::SUPER) || modifiers.contains(KeyModifiers::META);

    // Terminals report shift for characters like ':' and 'N'; the character
    // itself already carries it.
    let shift_matches = match chord.key {
        KeyCode::Char(_) if !chord.shift => true,
        _ => shift == chord.shift,
    };

    ctrl == chord.ctrl && alt == chord.alt && meta == chord.meta && shift_matches
}

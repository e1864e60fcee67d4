//! Prompt-prefixed line buffer.
//!
//! The first character is the prompt (`:` or `/`); the rest is the text the
//! user typed. An empty buffer means the mode holding it is inactive.

use crossterm::event::KeyEvent;

use super::typed_char;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    contents: String,
}

impl LineBuffer {
    /// Start a new line. A printable trigger becomes the prompt, otherwise
    /// `fallback` does.
    pub fn begin(&mut self, trigger: &KeyEvent, fallback: char) {
        self.contents.clear();
        self.contents.push(typed_char(trigger).unwrap_or(fallback));
    }

    pub fn push(&mut self, ch: char) {
        self.contents.push(ch);
    }

    pub fn push_str(&mut self, text: &str) {
        self.contents.push_str(text);
    }

    /// Delete the last typed character. Deleting the prompt empties the buffer.
    pub fn backspace(&mut self) {
        self.contents.pop();
    }

    pub fn clear(&mut self) {
        self.contents.clear();
    }

    /// Typed text without the prompt.
    pub fn text(&self) -> &str {
        let mut chars = self.contents.chars();
        chars.next();
        chars.as_str()
    }

    pub fn replace_text(&mut self, text: &str) {
        let prompt = self.contents.chars().next();
        self.contents.clear();
        if let Some(prompt) = prompt {
            self.contents.push(prompt);
        }
        self.contents.push_str(text);
    }

    /// Take the typed text and empty the buffer.
    pub fn take_text(&mut self) -> String {
        let text = self.text().to_string();
        self.contents.clear();
        text
    }

    pub fn as_str(&self) -> &str {
        &self.contents
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

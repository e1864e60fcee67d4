//! Cycling tab completion over operation names.
//!
//! The first completion after any other edit captures the typed prefix and
//! the matching names; each further completion moves to the next match and
//! wraps around. Any other keystroke resets the cursor.

#[derive(Debug, Default)]
pub struct TabCompleter {
    active: bool,
    partial: String,
    candidates: Vec<String>,
    cursor: usize,
}

impl TabCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete `partial` against `names`, which must already be in their
    /// fixed order. Returns `partial` unchanged when nothing matches.
    pub fn complete<'a, I>(&mut self, partial: &str, names: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.active {
            self.active = true;
            self.partial = partial.to_string();
            self.candidates = names
                .into_iter()
                .filter(|name| name.starts_with(partial))
                .map(str::to_string)
                .collect();
            self.cursor = 0;
        } else if !self.candidates.is_empty() {
            self.cursor = (self.cursor + 1) % self.candidates.len();
        }

        self.candidates
            .get(self.cursor)
            .cloned()
            .unwrap_or_else(|| self.partial.clone())
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.partial.clear();
        self.candidates.clear();
        self.cursor = 0;
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

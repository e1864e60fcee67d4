//! User-defined aliases.
//!
//! An alias maps a name to replacement command text. The text replaces the
//! whole command line when the alias is invoked.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name`, replacing any previous definition.
    pub fn insert(&mut self, name: &str, expansion: &str) {
        self.entries.insert(name.to_string(), expansion.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, expansion)| (name.as_str(), expansion.as_str()))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

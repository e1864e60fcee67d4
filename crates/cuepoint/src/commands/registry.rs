//! Operation table.
//!
//! Maps exact command names to bound operations. Lookup is exact only;
//! prefix matching exists solely for tab completion.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::CommandError;
use crate::session::Services;

use super::alias::AliasTable;

/// What an operation needs from the server before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Runs without a server (settings, aliases, echo, ...).
    Local,
    /// Establishes the server connection.
    Connect,
    /// Needs an established connection.
    Player,
}

/// Everything an operation may touch while it runs.
pub struct Invocation<'a> {
    pub services: &'a mut Services,
    pub aliases: &'a mut AliasTable,
    pub operations: &'a OperationTable,
}

pub type OperationFn = Box<dyn Fn(&mut Invocation<'_>, &str) -> Result<(), CommandError>>;

pub struct Operation {
    pub name: String,
    pub description: String,
    pub kind: OperationKind,
    run: OperationFn,
}

impl Operation {
    pub fn invoke(&self, invocation: &mut Invocation<'_>, args: &str) -> Result<(), CommandError> {
        (self.run)(invocation, args)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct OperationTable {
    entries: BTreeMap<String, Operation>,
}

impl OperationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, description: &str, kind: OperationKind, run: F)
    where
        F: Fn(&mut Invocation<'_>, &str) -> Result<(), CommandError> + 'static,
    {
        self.entries.insert(
            name.to_string(),
            Operation {
                name: name.to_string(),
                description: description.to_string(),
                kind,
                run: Box::new(run),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.entries.get(name)
    }

    /// Names in their fixed (lexicographic) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One line per operation, aligned like `:name  description`.
    pub fn help_lines(&self) -> Vec<String> {
        let longest = self.names().map(str::len).max().unwrap_or(0);
        self.entries
            .values()
            .map(|op| format!(":{:<width$} {}", op.name, op.description, width = longest))
            .collect()
    }
}

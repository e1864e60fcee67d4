//! Ex command system.
//!
//! This module turns a typed command line into an operation call:
//! - Parsing: splitting `name arguments` (parse.rs)
//! - Aliases: user-defined names expanding to whole command lines (alias.rs)
//! - Registry: exact-name operation table (registry.rs)
//! - Built-ins: the operations registered at startup (builtin.rs)
//! - Execution: alias resolution, dispatch and startup queueing (exec.rs)
//! - Completion: cycling tab completion over operation names (complete.rs)
//!
//! Commands follow a `:name [args]` pattern similar to Vim.

mod alias;
mod builtin;
mod complete;
mod exec;
mod parse;
mod registry;

pub use exec::CommandInterpreter;
pub use parse::{split_command, startup_line};

#[cfg(test)]
mod tests;

//! Command interpreter.
//!
//! Resolves a command line through the alias table into an operation and
//! runs it. Alias expansion is an explicit loop with a depth bound, so
//! self-referential aliases end in `AliasCycleExceeded` instead of
//! recursing forever.
//!
//! While startup commands are being read, connect and player operations
//! are queued and only run once the startup stream is exhausted.

use crate::error::CommandError;
use crate::session::Services;

use super::alias::AliasTable;
use super::builtin::register_builtins;
use super::complete::TabCompleter;
use super::parse::split_command;
use super::registry::{Invocation, OperationKind, OperationTable};

pub const MAX_ALIAS_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedCommand {
    pub name: String,
    pub args: String,
    pub kind: OperationKind,
}

#[derive(Debug)]
pub struct CommandInterpreter {
    aliases: AliasTable,
    operations: OperationTable,
    completer: TabCompleter,
    queue_commands: bool,
    queued: Vec<QueuedCommand>,
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandInterpreter {
    /// Interpreter with the built-in operation set.
    pub fn new() -> Self {
        let mut operations = OperationTable::new();
        register_builtins(&mut operations);
        Self::with_operations(operations)
    }

    pub fn with_operations(operations: OperationTable) -> Self {
        Self {
            aliases: AliasTable::new(),
            operations,
            completer: TabCompleter::new(),
            queue_commands: false,
            queued: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    #[cfg(test)]
    pub fn operations(&self) -> &OperationTable {
        &self.operations
    }

    /// Split `line` and execute it. An empty line is a successful no-op.
    pub fn execute_line(&mut self, line: &str, services: &mut Services) -> Result<(), CommandError> {
        let (name, args) = split_command(line);
        self.execute(&name, &args, services)
    }

    /// Execute an already split command, expanding aliases first.
    pub fn execute(
        &mut self,
        name: &str,
        args: &str,
        services: &mut Services,
    ) -> Result<(), CommandError> {
        let (name, args) = self.resolve(name, args)?;
        if name.is_empty() {
            return Ok(());
        }
        tracing::debug!(command = %name, args = %args, "execute");
        self.invoke(&name, &args, services)
    }

    /// Follow alias expansions until a non-alias name remains.
    fn resolve(&self, name: &str, args: &str) -> Result<(String, String), CommandError> {
        let origin = name;
        let mut name = name.to_string();
        let mut args = args.to_string();
        let mut depth = 0;
        while let Some(expansion) = self.aliases.get(&name) {
            depth += 1;
            if depth > MAX_ALIAS_DEPTH {
                return Err(CommandError::AliasCycleExceeded {
                    alias: origin.to_string(),
                    depth: MAX_ALIAS_DEPTH,
                });
            }
            (name, args) = split_command(expansion);
        }
        Ok((name, args))
    }

    fn invoke(&mut self, name: &str, args: &str, services: &mut Services) -> Result<(), CommandError> {
        let Some(operation) = self.operations.get(name) else {
            return Err(CommandError::UnknownCommand(name.to_string()));
        };

        if self.queue_commands && operation.kind != OperationKind::Local {
            tracing::debug!(command = name, "queued until startup completes");
            self.queued.push(QueuedCommand {
                name: name.to_string(),
                args: args.to_string(),
                kind: operation.kind,
            });
            return Ok(());
        }

        if operation.kind == OperationKind::Player && !services.client.is_connected() {
            return Err(CommandError::ConnectionUnavailable);
        }

        let kind = operation.kind;
        let mut invocation = Invocation {
            services: &mut *services,
            aliases: &mut self.aliases,
            operations: &self.operations,
        };
        operation.invoke(&mut invocation, args)?;

        if kind == OperationKind::Connect && !self.queued.is_empty() {
            for err in self.flush_queued_commands(services) {
                services.report_error(&err);
            }
        }
        Ok(())
    }

    pub fn set_queue_commands(&mut self, queue: bool) {
        self.queue_commands = queue;
    }

    #[cfg(test)]
    pub fn queued_commands(&self) -> &[QueuedCommand] {
        &self.queued
    }

    /// Run queued commands: connects first, then the rest in arrival order.
    ///
    /// Queued connects are dropped when `skipconfigconnects` is set. Player
    /// commands stay queued if no connection has been established.
    pub fn flush_queued_commands(&mut self, services: &mut Services) -> Vec<CommandError> {
        self.queue_commands = false;
        let queued = std::mem::take(&mut self.queued);
        let (connects, rest): (Vec<_>, Vec<_>) = queued
            .into_iter()
            .partition(|command| command.kind == OperationKind::Connect);

        let mut errors = Vec::new();
        if !services.settings.skip_config_connects() {
            for command in connects {
                if let Err(err) = self.invoke(&command.name, &command.args, services) {
                    errors.push(err);
                }
            }
        }

        if !services.client.is_connected() {
            self.queued = rest;
            return errors;
        }

        for command in rest {
            if let Err(err) = self.invoke(&command.name, &command.args, services) {
                errors.push(err);
            }
        }
        errors
    }

    pub fn tab_complete(&mut self, partial: &str) -> String {
        self.completer.complete(partial, self.operations.names())
    }

    pub fn reset_tab_completion(&mut self) {
        self.completer.reset();
    }
}

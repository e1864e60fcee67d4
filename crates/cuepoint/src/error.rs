//! Error types.
//!
//! `CommandError` is what every ex command returns; it never escapes the
//! command interpreter and is shown on the status line instead.
//! `AppError` covers the process boundary (terminal and config failures).

use thiserror::Error;

use crate::client::ClientError;
use crate::settings::SettingsError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Not an editor command: {0}")]
    UnknownCommand(String),

    #[error("Alias '{alias}' did not resolve after {depth} expansions")]
    AliasCycleExceeded { alias: String, depth: usize },

    #[error(transparent)]
    MalformedSetArgument(#[from] SettingsError),

    #[error("Not connected to a server, use :connect <host> [port]")]
    ConnectionUnavailable,

    #[error("{0}")]
    Client(String),

    #[error("Usage: {0}")]
    Usage(String),
}

impl From<ClientError> for CommandError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotConnected => CommandError::ConnectionUnavailable,
            other => CommandError::Client(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

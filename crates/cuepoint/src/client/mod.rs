//! Player client.
//!
//! The interpreter only talks to the server through the `Client` trait.
//! `MpcClient` drives the stock `mpc` command line tool: every request is a
//! separate `mpc --host=H --port=P ...` invocation whose stdout, stderr and
//! exit code are captured.

use std::process::Command;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 6600;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("not connected")]
    NotConnected,

    #[error("failed to run mpc: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("mpc exited with {code}: {stderr}")]
    Failed { code: i32, stderr: String },
}

pub trait Client {
    /// Point the client at a server and check that it answers.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), ClientError>;

    fn is_connected(&self) -> bool;

    /// Forward raw `mpc` arguments, returning whatever the server printed.
    fn run(&mut self, args: &str) -> Result<String, ClientError>;

    /// Current playback status, used by the idle refresh tick.
    fn status(&mut self) -> Result<String, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ExecResult {
    pub ok: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug)]
pub struct MpcClient {
    program: String,
    host: Option<String>,
    port: Option<u16>,
    connected: bool,
}

impl Default for MpcClient {
    fn default() -> Self {
        Self::new("mpc")
    }
}

impl MpcClient {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            host: None,
            port: None,
            connected: false,
        }
    }

    #[cfg(test)]
    pub fn endpoint(&self) -> Option<(&str, u16)> {
        Some((self.host.as_deref()?, self.port?))
    }

    fn exec(&self, args: &[&str]) -> Result<ExecResult, ClientError> {
        let mut command = Command::new(&self.program);
        if let Some(host) = &self.host {
            command.arg(format!("--host={host}"));
        }
        if let Some(port) = self.port {
            command.arg(format!("--port={port}"));
        }
        let out = command.args(args).output()?;
        Ok(ExecResult {
            ok: out.status.success(),
            exit_code: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        })
    }

    fn exec_checked(&self, args: &[&str]) -> Result<String, ClientError> {
        let result = self.exec(args)?;
        if result.ok {
            return Ok(result.stdout);
        }
        tracing::warn!(
            args = ?args,
            code = result.exit_code,
            stderr = result.stderr.trim(),
            "mpc request failed"
        );
        Err(ClientError::Failed {
            code: result.exit_code,
            stderr: result.stderr.trim().to_string(),
        })
    }
}

impl Client for MpcClient {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), ClientError> {
        self.host = Some(host.to_string());
        self.port = Some(port);
        self.connected = false;
        self.exec_checked(&["status"])?;
        self.connected = true;
        tracing::info!(host, port, "connected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn run(&mut self, args: &str) -> Result<String, ClientError> {
        if !self.connected {
            return Err(ClientError::NotConnected);
        }
        let args: Vec<&str> = args.split_whitespace().collect();
        self.exec_checked(&args)
    }

    fn status(&mut self) -> Result<String, ClientError> {
        if !self.connected {
            return Err(ClientError::NotConnected);
        }
        self.exec_checked(&["status"])
    }
}

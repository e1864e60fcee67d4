//! Helpers shared by unit tests.

use std::cell::RefCell;
use std::env;
use std::rc::Rc;
use std::sync::{Mutex, OnceLock};

use crate::client::{Client, ClientError};
use crate::config::ServerConfig;
use crate::session::Services;
use crate::settings::Settings;

pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct EnvVarGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvVarGuard {
    pub fn set(key: &'static str, value: String) -> Self {
        let original = env::var(key).ok();
        env::set_var(key, value);
        Self { key, original }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(value) = &self.original {
            env::set_var(self.key, value);
        } else {
            env::remove_var(self.key);
        }
    }
}

/// What a `FakeClient` has been asked to do.
#[derive(Debug, Default)]
pub struct FakeClientLog {
    pub connects: Vec<(String, u16)>,
    pub runs: Vec<String>,
    pub connected: bool,
    pub refuse_connect: bool,
    pub playlist: String,
}

/// In-memory client; the log is shared so tests can inspect it after the
/// client has been boxed into `Services`.
#[derive(Debug, Clone, Default)]
pub struct FakeClient {
    pub log: Rc<RefCell<FakeClientLog>>,
}

impl FakeClient {
    pub fn connected() -> Self {
        let client = Self::default();
        client.log.borrow_mut().connected = true;
        client
    }
}

impl Client for FakeClient {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), ClientError> {
        let mut log = self.log.borrow_mut();
        log.connects.push((host.to_string(), port));
        if log.refuse_connect {
            return Err(ClientError::Failed {
                code: 1,
                stderr: "Connection refused".to_string(),
            });
        }
        log.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.log.borrow().connected
    }

    fn run(&mut self, args: &str) -> Result<String, ClientError> {
        let mut log = self.log.borrow_mut();
        log.runs.push(args.to_string());
        if args == "playlist" {
            return Ok(log.playlist.clone());
        }
        Ok(format!("ok: {args}\n"))
    }

    fn status(&mut self) -> Result<String, ClientError> {
        if !self.log.borrow().connected {
            return Err(ClientError::NotConnected);
        }
        Ok("[playing] #1/3 0:10/3:00\n".to_string())
    }
}

pub fn services_with(client: FakeClient) -> Services {
    Services::new(
        Box::new(client),
        Settings::default(),
        ServerConfig::default(),
    )
}

//! Application orchestration and main event loop.
//!
//! This module owns the application lifecycle:
//! - Startup (config, startup command stream, initial connect)
//! - Event loop (key input, idle status polling, resize)
//! - UI rendering delegation
//!
//! All state lives in `App`: the mode registry and the session it drives.
//! Events are processed one at a time on the main thread.
//!
//! Submodules:
//! - runner: terminal setup and the main loop
//! - render: drawing the frame

mod render;
mod runner;

use std::path::PathBuf;

use crossterm::event::KeyEvent;

use crate::client::Client;
use crate::commands::CommandInterpreter;
use crate::config::{load_startup_commands, Config, ServerConfig};
use crate::keymap::Keymap;
use crate::modes::ModeRegistry;
use crate::session::{Services, Session};
use crate::settings::Settings;

pub use runner::run;

const NO_CONNECTION_HINT: &str =
    "Failed to connect to server, please ensure it is running and type :connect <server> [port]";

/// Launch options that override the config file.
#[derive(Debug, Clone, Default)]
pub struct Launch {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub rc: Option<PathBuf>,
}

impl Launch {
    fn overrides_server(&self) -> bool {
        self.host.is_some() || self.port.is_some()
    }

    fn server(&self, config: &ServerConfig) -> ServerConfig {
        ServerConfig {
            host: self.host.clone().unwrap_or_else(|| config.host.clone()),
            port: self.port.unwrap_or(config.port),
        }
    }
}

pub struct App {
    pub registry: ModeRegistry,
    pub session: Session,
}

impl App {
    /// Build the app and run the startup sequence against `client`.
    pub fn new(config: &Config, launch: &Launch, client: Box<dyn Client>) -> Self {
        let server = launch.server(&config.server);
        let mut settings = Settings::default();
        settings.set_skip_config_connects(launch.overrides_server());

        let services = Services::new(client, settings, server.clone());
        let mut session = Session::new(CommandInterpreter::new(), services);
        let keymap = Keymap::from_config(&config.keymap);
        let mut registry = ModeRegistry::from_keymap(&keymap);
        registry.start(&mut session);

        let rc = launch.rc.clone().or_else(|| config.startup.rc.clone());
        let lines = rc.as_deref().map(load_startup_commands).unwrap_or_default();
        tracing::info!(commands = lines.len(), "running startup commands");
        let errors = session.run_startup(lines.iter().map(String::as_str));
        session.services.settings.set_skip_config_connects(false);

        if !session.services.client.is_connected() {
            let args = format!("{} {}", server.host, server.port);
            if let Err(err) = session.execute("connect", &args) {
                tracing::warn!(error = %err, host = %server.host, port = server.port, "initial connect failed");
            }
        }

        for err in &errors {
            session.services.report_error(err);
        }
        if !session.services.client.is_connected() {
            session.services.status.error(NO_CONNECTION_HINT);
        }

        registry.refresh(&mut session);
        Self { registry, session }
    }

    pub fn on_key(&mut self, key: &KeyEvent) {
        self.registry.dispatch(key, &mut self.session);
    }

    /// Idle tick: poll the server when polling is enabled.
    pub fn on_tick(&mut self) {
        if self.session.services.settings.polling() {
            self.session.services.refresh_server_status();
        }
        self.registry.refresh(&mut self.session);
    }

    pub fn on_resize(&mut self) {
        self.session.services.refresh_requested = true;
    }

    pub fn should_quit(&self) -> bool {
        self.session.services.shutdown.is_requested()
    }
}

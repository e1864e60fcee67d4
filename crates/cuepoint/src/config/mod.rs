//! Configuration loading.
//!
//! Config is read from `$XDG_CONFIG_HOME/cuepoint/config.toml` (or the path
//! given with `--config`). Every field is optional; anything missing or
//! unreadable falls back to the defaults below. Uses TOML format with serde.
//!
//! The startup command stream is a separate plain-text file of ex commands
//! (`cuepointrc`), one per line.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::{DEFAULT_HOST, DEFAULT_PORT};
use crate::commands::startup_line;

const DEFAULT_COMMAND_KEY: &str = ":";
const DEFAULT_SEARCH_KEY: &str = "/";
const DEFAULT_COMPLETE_KEY: &str = "tab";
const DEFAULT_ESCAPE_KEY: &str = "esc";
const CONFIG_FILE: &str = "config.toml";
const RC_FILE: &str = "cuepointrc";

/// Normal mode bindings that exist unless the config overrides them.
const DEFAULT_NORMAL_BINDINGS: &[(&str, &str)] = &[
    ("p", "pause"),
    ("P", "play"),
    ("s", "stop"),
    (">", "next"),
    ("<", "previous"),
    ("n", "searchnext"),
    ("N", "searchprev"),
    ("q", "quit"),
    ("c", ":connect "),
];

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub keymap: KeymapConfig,
    pub startup: StartupConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        build_config(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeymapConfig {
    pub command: String,
    pub search: String,
    pub complete: String,
    pub escape: String,
    /// Chord -> ex command line. A leading `:` opens the command line
    /// pre-filled with the rest of the value instead of running it.
    pub normal: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub rc: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    server: Option<RawServer>,
    keymap: Option<RawKeymap>,
    startup: Option<RawStartup>,
    log: Option<RawLog>,
}

#[derive(Debug, Default, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct RawKeymap {
    command: Option<String>,
    search: Option<String>,
    complete: Option<String>,
    escape: Option<String>,
    normal: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStartup {
    rc: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLog {
    file: Option<String>,
    level: Option<String>,
}

fn read_toml(path: &Path) -> Option<RawConfig> {
    let contents = fs::read_to_string(path).ok()?;
    if contents.trim().is_empty() {
        return None;
    }
    match toml::from_str::<RawConfig>(&contents) {
        Ok(raw) => Some(raw),
        Err(err) => {
            tracing::warn!("Failed to parse {}: {}", path.display(), err);
            None
        }
    }
}

fn build_config(raw: Option<RawConfig>) -> Config {
    let raw = raw.unwrap_or_default();

    let server = raw.server.unwrap_or_default();
    let server = ServerConfig {
        host: server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: server.port.unwrap_or(DEFAULT_PORT),
    };

    let keymap = raw.keymap.unwrap_or_default();
    let mut normal: BTreeMap<String, String> = DEFAULT_NORMAL_BINDINGS
        .iter()
        .map(|(chord, line)| (chord.to_string(), line.to_string()))
        .collect();
    for (chord, line) in keymap.normal.unwrap_or_default() {
        // An empty value unbinds a default.
        if line.trim().is_empty() {
            normal.remove(&chord);
        } else {
            normal.insert(chord, line);
        }
    }
    let keymap = KeymapConfig {
        command: keymap
            .command
            .unwrap_or_else(|| DEFAULT_COMMAND_KEY.to_string()),
        search: keymap
            .search
            .unwrap_or_else(|| DEFAULT_SEARCH_KEY.to_string()),
        complete: keymap
            .complete
            .unwrap_or_else(|| DEFAULT_COMPLETE_KEY.to_string()),
        escape: keymap
            .escape
            .unwrap_or_else(|| DEFAULT_ESCAPE_KEY.to_string()),
        normal,
    };

    let startup = StartupConfig {
        rc: raw
            .startup
            .and_then(|s| s.rc)
            .map(|rc| expand_home(&rc))
            .or_else(default_rc_path),
    };

    let log = raw
        .log
        .map(|log| LogConfig {
            file: log.file.map(|file| expand_home(&file)),
            level: log.level,
        })
        .unwrap_or_default();

    Config {
        server,
        keymap,
        startup,
        log,
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("cuepoint"))
}

pub fn user_config_path() -> Option<PathBuf> {
    Some(config_dir()?.join(CONFIG_FILE))
}

pub fn default_rc_path() -> Option<PathBuf> {
    Some(config_dir()?.join(RC_FILE))
}

/// Load config from `path`, or from the user config location when `None`.
pub fn load_config(path: Option<&Path>) -> Config {
    let path = path.map(Path::to_path_buf).or_else(user_config_path);
    let raw = path.as_deref().and_then(read_toml);
    build_config(raw)
}

/// Read the startup command stream. A missing file yields no commands.
pub fn load_startup_commands(path: &Path) -> Vec<String> {
    let Ok(contents) = fs::read_to_string(path) else {
        tracing::debug!("No startup file at {}", path.display());
        return Vec::new();
    };
    contents
        .lines()
        .filter_map(startup_line)
        .map(str::to_string)
        .collect()
}

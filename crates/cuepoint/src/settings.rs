//! Runtime options changed with `:set`.
//!
//! Options are either boolean flags or integers. Boolean flags accept the
//! vi forms `name`, `noname`, `name!` (toggle) and `name=true|false`.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

const DEFAULT_TIMEOUT_MS: u64 = 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Option {0} requires a value")]
    MissingValue(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Number(u64),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(value) => write!(f, "{value}"),
            SettingValue::Number(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    values: BTreeMap<&'static str, SettingValue>,
}

impl Default for Settings {
    fn default() -> Self {
        let values = BTreeMap::from([
            ("polling", SettingValue::Bool(true)),
            ("hlsearch", SettingValue::Bool(true)),
            ("ignorecase", SettingValue::Bool(true)),
            ("skipconfigconnects", SettingValue::Bool(false)),
            ("timeout", SettingValue::Number(DEFAULT_TIMEOUT_MS)),
        ]);
        Self { values }
    }
}

impl Settings {
    pub fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).copied()
    }

    /// Apply one `:set` token, already split into key and optional value.
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Result<(), SettingsError> {
        let (name, next) = self.resolve(key, value)?;
        tracing::debug!(option = name, value = %next, "setting changed");
        self.values.insert(name, next);
        Ok(())
    }

    /// Parse a single `key[=value]` token the way `:set` receives it.
    pub fn apply(&mut self, token: &str) -> Result<(), SettingsError> {
        match token.split_once('=') {
            Some((key, value)) => self.set(key.trim(), Some(value.trim())),
            None => self.set(token.trim(), None),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().copied()
    }

    pub fn polling(&self) -> bool {
        self.flag("polling")
    }

    pub fn highlight_search(&self) -> bool {
        self.flag("hlsearch")
    }

    pub fn ignore_case(&self) -> bool {
        self.flag("ignorecase")
    }

    pub fn skip_config_connects(&self) -> bool {
        self.flag("skipconfigconnects")
    }

    pub fn set_skip_config_connects(&mut self, skip: bool) {
        self.values
            .insert("skipconfigconnects", SettingValue::Bool(skip));
    }

    pub fn timeout_ms(&self) -> u64 {
        match self.get("timeout") {
            Some(SettingValue::Number(ms)) if ms > 0 => ms,
            _ => DEFAULT_TIMEOUT_MS,
        }
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(SettingValue::Bool(true)))
    }

    fn resolve(
        &self,
        key: &str,
        value: Option<&str>,
    ) -> Result<(&'static str, SettingValue), SettingsError> {
        if let Some((&name, &current)) = self.values.get_key_value(key) {
            let next = match (current, value) {
                (SettingValue::Bool(_), None) => SettingValue::Bool(true),
                (SettingValue::Bool(_), Some(raw)) => SettingValue::Bool(parse_bool(key, raw)?),
                (SettingValue::Number(_), None) => {
                    return Err(SettingsError::MissingValue(key.to_string()))
                }
                (SettingValue::Number(_), Some(raw)) => {
                    let parsed = raw.parse::<u64>().map_err(|_| SettingsError::InvalidValue {
                        key: key.to_string(),
                        value: raw.to_string(),
                    })?;
                    SettingValue::Number(parsed)
                }
            };
            return Ok((name, next));
        }

        if let Some(base) = key.strip_suffix('!') {
            if value.is_none() {
                if let Some((&name, SettingValue::Bool(current))) = self.values.get_key_value(base)
                {
                    return Ok((name, SettingValue::Bool(!current)));
                }
            }
        }

        if let Some(base) = key.strip_prefix("no") {
            if value.is_none() {
                if let Some((&name, SettingValue::Bool(_))) = self.values.get_key_value(base) {
                    return Ok((name, SettingValue::Bool(false)));
                }
            }
        }

        Err(SettingsError::UnknownOption(key.to_string()))
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, SettingsError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

//! Session state shared by every mode handler.
//!
//! `Session` pairs the command interpreter with the collaborators its
//! operations act on. Mode handlers receive `&mut Session` for the duration
//! of one call; nothing here is shared across threads.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::client::Client;
use crate::commands::CommandInterpreter;
use crate::config::ServerConfig;
use crate::error::CommandError;
use crate::settings::Settings;

pub const OUTPUT_MAX_LINES: usize = 200;

/// Stop flag for the event loop, set by `:quit`.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken(Arc<AtomicBool>);

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Message shown on the bottom line when no mode owns it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusLine {
    message: Option<String>,
    is_error: bool,
}

impl StatusLine {
    pub fn info(&mut self, message: impl Into<String>) {
        self.set(message.into(), false);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.set(message.into(), true);
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.is_error = false;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    fn set(&mut self, message: String, is_error: bool) {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            self.clear();
        } else {
            self.message = Some(trimmed.to_string());
            self.is_error = is_error;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// 1-based queue position.
    pub position: usize,
    pub line: String,
}

/// Last committed search and its matches in the queue listing.
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    query: String,
    matches: Vec<SearchMatch>,
    active_index: usize,
}

impl SearchState {
    pub fn run(&mut self, query: &str, listing: &str, ignore_case: bool) {
        self.query = query.to_string();
        self.active_index = 0;
        self.matches = listing
            .lines()
            .enumerate()
            .filter(|(_, line)| !match_ranges(line, query, ignore_case).is_empty())
            .map(|(idx, line)| SearchMatch {
                position: idx + 1,
                line: line.trim().to_string(),
            })
            .collect();
    }

    pub fn next(&mut self) {
        if self.matches.is_empty() {
            return;
        }
        self.active_index = (self.active_index + 1) % self.matches.len();
    }

    pub fn prev(&mut self) {
        if self.matches.is_empty() {
            return;
        }
        if self.active_index == 0 {
            self.active_index = self.matches.len() - 1;
        } else {
            self.active_index -= 1;
        }
    }

    pub fn current(&self) -> Option<&SearchMatch> {
        self.matches.get(self.active_index)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Byte ranges of non-overlapping matches of `query` in `line`.
///
/// Case folding is ASCII only, so ranges stay on the char boundaries of
/// `line`. Search matching and highlighting both go through here.
pub fn match_ranges(line: &str, query: &str, ignore_case: bool) -> Vec<Range<usize>> {
    if query.is_empty() {
        return Vec::new();
    }
    let (haystack, needle) = if ignore_case {
        (line.to_ascii_lowercase(), query.to_ascii_lowercase())
    } else {
        (line.to_string(), query.to_string())
    };
    haystack
        .match_indices(&needle)
        .map(|(start, found)| start..start + found.len())
        .collect()
}

/// A request to open a mode with a pre-filled buffer, raised by a handler
/// and carried out by the mode registry once the handler has returned.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub trigger: KeyEvent,
    pub initial: String,
}

pub struct Services {
    pub client: Box<dyn Client>,
    pub settings: Settings,
    pub server: ServerConfig,
    pub status: StatusLine,
    pub output: Vec<String>,
    pub server_status: Vec<String>,
    pub search: SearchState,
    /// Text the active mode wants on the bottom line (its input buffer).
    pub mode_line: Option<String>,
    pub prompt: Option<PromptRequest>,
    pub refresh_requested: bool,
    pub shutdown: ShutdownToken,
}

impl Services {
    pub fn new(client: Box<dyn Client>, settings: Settings, server: ServerConfig) -> Self {
        Self {
            client,
            settings,
            server,
            status: StatusLine::default(),
            output: Vec::new(),
            server_status: Vec::new(),
            search: SearchState::default(),
            mode_line: None,
            prompt: None,
            refresh_requested: false,
            shutdown: ShutdownToken::new(),
        }
    }

    /// Replace the output pane contents.
    pub fn show_output(&mut self, mut lines: Vec<String>) {
        lines.truncate(OUTPUT_MAX_LINES);
        self.output = lines;
    }

    pub fn set_server_status(&mut self, text: &str) {
        self.server_status = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
    }

    pub fn report_error(&mut self, err: &CommandError) {
        tracing::warn!(error = %err, "command failed");
        self.status.error(format!("E: {err}"));
    }

    /// Surface a command result on the status line. Returns whether it succeeded.
    pub fn report(&mut self, result: Result<(), CommandError>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.report_error(&err);
                false
            }
        }
    }

    /// Poll the server for status; used by the idle tick.
    pub fn refresh_server_status(&mut self) {
        if !self.client.is_connected() {
            return;
        }
        match self.client.status() {
            Ok(text) => self.set_server_status(&text),
            Err(err) => self.report_error(&CommandError::from(err)),
        }
    }
}

pub struct Session {
    pub interpreter: CommandInterpreter,
    pub services: Services,
}

impl Session {
    pub fn new(interpreter: CommandInterpreter, services: Services) -> Self {
        Self {
            interpreter,
            services,
        }
    }

    pub fn execute_line(&mut self, line: &str) -> Result<(), CommandError> {
        self.interpreter.execute_line(line, &mut self.services)
    }

    pub fn execute(&mut self, name: &str, args: &str) -> Result<(), CommandError> {
        self.interpreter.execute(name, args, &mut self.services)
    }

    /// Feed the startup command stream with connects and player commands
    /// held back, then flush them. Returns every error encountered.
    pub fn run_startup<'a, I>(&mut self, lines: I) -> Vec<CommandError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.interpreter.set_queue_commands(true);
        let mut errors = Vec::new();
        for line in lines {
            if let Err(err) = self.execute_line(line) {
                tracing::warn!(line, error = %err, "startup command failed");
                errors.push(err);
            }
        }
        errors.extend(
            self.interpreter
                .flush_queued_commands(&mut self.services),
        );
        errors
    }
}

//! Built-in operations.
//!
//! Registered once when the interpreter is built. Only `alias` mutates
//! interpreter state afterwards, and only the alias table.

use crate::client::DEFAULT_PORT;
use crate::error::CommandError;

use super::parse::split_alias_definition;
use super::registry::{Invocation, OperationKind, OperationTable};

/// Player operations forwarded straight to the client: (name, mpc verb, description).
const PLAYER_COMMANDS: &[(&str, &str, &str)] = &[
    ("play", "play", "Start playback, optionally at a queue position"),
    ("pause", "pause", "Pause playback"),
    ("toggle", "toggle", "Toggle between play and pause"),
    ("stop", "stop", "Stop playback"),
    ("next", "next", "Play the next song in the queue"),
    ("previous", "prev", "Play the previous song in the queue"),
    ("seek", "seek", "Seek within the current song ([+-]seconds or percent)"),
    ("volume", "volume", "Set or adjust the volume"),
    ("random", "random", "Toggle or set random mode (on|off)"),
    ("repeat", "repeat", "Toggle or set repeat mode (on|off)"),
    ("single", "single", "Toggle or set single mode (on|off)"),
    ("consume", "consume", "Toggle or set consume mode (on|off)"),
    ("clear", "clear", "Remove every song from the queue"),
    ("shuffle", "shuffle", "Shuffle the queue"),
];

pub fn register_builtins(table: &mut OperationTable) {
    table.register(
        "set",
        "Change options: key, nokey, key!, key=value",
        OperationKind::Local,
        set,
    );
    table.register(
        "mpc",
        "Pass the arguments to the mpc client",
        OperationKind::Player,
        mpc,
    );
    table.register(
        "alias",
        "Define an alias: alias <name> <command>",
        OperationKind::Local,
        alias,
    );
    table.register(
        "connect",
        "Connect to a server: connect [host] [port]",
        OperationKind::Connect,
        connect,
    );
    table.register("echo", "Show a message", OperationKind::Local, echo);
    table.register("help", "Show available commands", OperationKind::Local, help);
    table.register(
        "redraw",
        "Redraw the screen",
        OperationKind::Local,
        |inv, _| {
            inv.services.refresh_requested = true;
            Ok(())
        },
    );
    table.register("quit", "Exit", OperationKind::Local, quit);
    table.register("q", "Alias for :quit", OperationKind::Local, quit);
    table.register(
        "search",
        "Search the queue for a pattern",
        OperationKind::Player,
        search,
    );
    table.register(
        "searchnext",
        "Jump to the next search match",
        OperationKind::Local,
        |inv, _| {
            inv.services.search.next();
            report_search_position(inv);
            Ok(())
        },
    );
    table.register(
        "searchprev",
        "Jump to the previous search match",
        OperationKind::Local,
        |inv, _| {
            inv.services.search.prev();
            report_search_position(inv);
            Ok(())
        },
    );

    for &(name, verb, description) in PLAYER_COMMANDS {
        table.register(name, description, OperationKind::Player, move |inv, args| {
            let request = if args.is_empty() {
                verb.to_string()
            } else {
                format!("{verb} {args}")
            };
            let output = inv.services.client.run(&request)?;
            inv.services.set_server_status(&output);
            Ok(())
        });
    }
}

fn set(inv: &mut Invocation<'_>, args: &str) -> Result<(), CommandError> {
    if args.trim().is_empty() {
        let settings = &inv.services.settings;
        let lines: Vec<String> = settings
            .names()
            .filter_map(|name| settings.get(name).map(|value| format!("{name}={value}")))
            .collect();
        inv.services.show_output(lines);
        return Ok(());
    }
    // Every token must apply before any of them takes effect.
    let mut staged = inv.services.settings.clone();
    for token in args.split_whitespace() {
        staged.apply(token)?;
    }
    inv.services.settings = staged;
    Ok(())
}

fn mpc(inv: &mut Invocation<'_>, args: &str) -> Result<(), CommandError> {
    if args.is_empty() {
        return Err(CommandError::Usage("mpc <arguments>".to_string()));
    }
    let output = inv.services.client.run(args)?;
    inv.services
        .show_output(output.lines().map(str::to_string).collect());
    Ok(())
}

fn alias(inv: &mut Invocation<'_>, args: &str) -> Result<(), CommandError> {
    let Some((name, expansion)) = split_alias_definition(args) else {
        let lines: Vec<String> = inv
            .aliases
            .iter()
            .map(|(name, expansion)| format!("{name} -> {expansion}"))
            .collect();
        if lines.is_empty() {
            inv.services.status.info("No aliases defined");
        } else {
            inv.services.show_output(lines);
        }
        return Ok(());
    };

    if expansion.is_empty() {
        match inv.aliases.get(name) {
            Some(existing) => {
                let message = format!("{name} -> {existing}");
                inv.services.status.info(message);
            }
            None => inv.services.status.info(format!("No such alias: {name}")),
        }
        return Ok(());
    }

    tracing::debug!(alias = name, expansion, "alias defined");
    inv.aliases.insert(name, expansion);
    Ok(())
}

fn connect(inv: &mut Invocation<'_>, args: &str) -> Result<(), CommandError> {
    let mut parts = args.split_whitespace();
    let host = parts
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| inv.services.server.host.clone());
    let port = match parts.next() {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|_| CommandError::Usage("connect [host] [port]".to_string()))?,
        None if args.is_empty() => inv.services.server.port,
        None => DEFAULT_PORT,
    };
    if parts.next().is_some() {
        return Err(CommandError::Usage("connect [host] [port]".to_string()));
    }

    inv.services.client.connect(&host, port)?;
    inv.services
        .status
        .info(format!("Connected to {host}:{port}"));
    if let Ok(status) = inv.services.client.status() {
        inv.services.set_server_status(&status);
    }
    Ok(())
}

fn echo(inv: &mut Invocation<'_>, args: &str) -> Result<(), CommandError> {
    inv.services.status.info(args);
    Ok(())
}

fn help(inv: &mut Invocation<'_>, _args: &str) -> Result<(), CommandError> {
    let lines = inv.operations.help_lines();
    inv.services.show_output(lines);
    Ok(())
}

fn quit(inv: &mut Invocation<'_>, _args: &str) -> Result<(), CommandError> {
    inv.services.shutdown.request();
    Ok(())
}

fn search(inv: &mut Invocation<'_>, args: &str) -> Result<(), CommandError> {
    let pattern = args.trim();
    if pattern.is_empty() {
        return Err(CommandError::Usage("search <pattern>".to_string()));
    }
    let listing = inv.services.client.run("playlist")?;
    let ignore_case = inv.services.settings.ignore_case();
    inv.services.search.run(pattern, &listing, ignore_case);
    report_search_position(inv);
    Ok(())
}

fn report_search_position(inv: &mut Invocation<'_>) {
    let search = &inv.services.search;
    let message = match search.current() {
        Some(found) => format!(
            "[{}/{}] {}: {}",
            search.active_index() + 1,
            search.len(),
            found.position,
            found.line
        ),
        None if search.query().is_empty() => "No previous search".to_string(),
        None => format!("Pattern not found: {}", search.query()),
    };
    inv.services.status.info(message);
}

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::exec::{CommandInterpreter, MAX_ALIAS_DEPTH};
use super::registry::{OperationKind, OperationTable};
use crate::error::CommandError;
use crate::settings::SettingValue;
use crate::test_utils::{services_with, FakeClient};

type Calls = Rc<RefCell<Vec<(String, String)>>>;

/// Interpreter whose operations only record how they were called.
fn recording_interpreter(names: &[(&'static str, OperationKind)]) -> (CommandInterpreter, Calls) {
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let mut table = OperationTable::new();
    for &(name, kind) in names {
        let calls = Rc::clone(&calls);
        table.register(name, "recorded", kind, move |_, args| {
            calls.borrow_mut().push((name.to_string(), args.to_string()));
            Ok(())
        });
    }
    (CommandInterpreter::with_operations(table), calls)
}

#[test]
fn execute_invokes_exactly_the_named_operation() {
    let (mut interpreter, calls) = recording_interpreter(&[
        ("set", OperationKind::Local),
        ("seek", OperationKind::Local),
        ("search", OperationKind::Local),
    ]);
    let mut services = services_with(FakeClient::default());

    interpreter
        .execute("seek", "  +10 spaced  ", &mut services)
        .expect("seek");
    interpreter
        .execute_line("set   polling=true  ", &mut services)
        .expect("set");

    assert_eq!(
        *calls.borrow(),
        vec![
            ("seek".to_string(), "  +10 spaced  ".to_string()),
            ("set".to_string(), "polling=true".to_string()),
        ]
    );
}

#[test]
fn empty_line_is_a_successful_no_op() {
    let (mut interpreter, calls) = recording_interpreter(&[("set", OperationKind::Local)]);
    let mut services = services_with(FakeClient::default());

    interpreter.execute_line("   ", &mut services).expect("empty");
    assert!(calls.borrow().is_empty());
}

#[test]
fn alias_expands_to_the_same_effect_as_its_target() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());

    interpreter
        .execute("alias", "foo set polling=false", &mut services)
        .expect("alias");
    interpreter.execute("foo", "", &mut services).expect("foo");
    let via_alias = services.settings.get("polling");

    let mut direct = services_with(FakeClient::default());
    CommandInterpreter::new()
        .execute("set", "polling=false", &mut direct)
        .expect("set");

    assert_eq!(via_alias, Some(SettingValue::Bool(false)));
    assert_eq!(via_alias, direct.settings.get("polling"));
}

#[test]
fn alias_expansion_replaces_the_whole_line() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());

    interpreter
        .execute_line("alias hi echo hello", &mut services)
        .expect("alias");
    assert_eq!(interpreter.aliases().get("hi"), Some("echo hello"));

    interpreter
        .execute_line("hi ignored words", &mut services)
        .expect("hi");
    assert_eq!(services.status.message(), Some("hello"));
}

#[test]
fn alias_redefinition_is_last_write_wins() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());

    interpreter
        .execute_line("alias x echo one", &mut services)
        .expect("first");
    interpreter
        .execute_line("alias x echo two", &mut services)
        .expect("second");

    assert_eq!(interpreter.aliases().len(), 1);
    interpreter.execute_line("x", &mut services).expect("x");
    assert_eq!(services.status.message(), Some("two"));
}

#[test]
fn mutually_recursive_aliases_fail_instead_of_looping() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());
    interpreter
        .execute_line("alias a b", &mut services)
        .expect("alias a");
    interpreter
        .execute_line("alias b a", &mut services)
        .expect("alias b");

    let err = interpreter
        .execute("a", "", &mut services)
        .expect_err("cycle must fail");
    match err {
        CommandError::AliasCycleExceeded { alias, depth } => {
            assert_eq!(alias, "a");
            assert_eq!(depth, MAX_ALIAS_DEPTH);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(services.output.is_empty());
}

#[test]
fn self_referential_alias_fails() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());
    interpreter
        .execute_line("alias loop loop again", &mut services)
        .expect("alias");

    let err = interpreter
        .execute_line("loop", &mut services)
        .expect_err("cycle must fail");
    assert!(matches!(err, CommandError::AliasCycleExceeded { .. }));
}

#[test]
fn unknown_command_fails_and_changes_nothing() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());
    interpreter
        .execute_line("alias np mpc current", &mut services)
        .expect("alias");
    let operations_before: Vec<String> =
        interpreter.operations().names().map(str::to_string).collect();
    let aliases_before: Vec<(String, String)> = interpreter
        .aliases()
        .iter()
        .map(|(name, expansion)| (name.to_string(), expansion.to_string()))
        .collect();

    let err = interpreter
        .execute("bogus", "x", &mut services)
        .expect_err("unknown");
    assert_eq!(err.to_string(), "Not an editor command: bogus");

    let operations_after: Vec<String> =
        interpreter.operations().names().map(str::to_string).collect();
    let aliases_after: Vec<(String, String)> = interpreter
        .aliases()
        .iter()
        .map(|(name, expansion)| (name.to_string(), expansion.to_string()))
        .collect();
    assert_eq!(operations_before, operations_after);
    assert_eq!(aliases_before, aliases_after);
}

#[test]
fn operation_names_match_exactly() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());

    assert!(matches!(
        interpreter.execute_line("SET polling", &mut services),
        Err(CommandError::UnknownCommand(_))
    ));
    assert!(matches!(
        interpreter.execute_line("se polling", &mut services),
        Err(CommandError::UnknownCommand(_))
    ));
}

#[test]
fn malformed_set_argument_is_reported() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());

    let err = interpreter
        .execute_line("set timeout=soon", &mut services)
        .expect_err("invalid value");
    assert!(matches!(err, CommandError::MalformedSetArgument(_)));
    assert_eq!(services.settings.timeout_ms(), 1000);
}

#[test]
fn tab_completion_cycles_through_every_match() {
    let (mut interpreter, _) = recording_interpreter(&[
        ("set", OperationKind::Local),
        ("search", OperationKind::Local),
        ("seek", OperationKind::Local),
    ]);

    let first = interpreter.tab_complete("se");
    let second = interpreter.tab_complete("se");
    let third = interpreter.tab_complete("se");
    let wrapped = interpreter.tab_complete("se");

    assert_eq!(
        vec![first.as_str(), second.as_str(), third.as_str()],
        vec!["search", "seek", "set"]
    );
    assert_eq!(wrapped, first);
}

#[test]
fn tab_completion_restarts_after_reset() {
    let mut interpreter = CommandInterpreter::new();

    assert_eq!(interpreter.tab_complete("qu"), "quit");
    interpreter.reset_tab_completion();
    assert_eq!(interpreter.tab_complete("xyz"), "xyz");
    interpreter.reset_tab_completion();
    assert_eq!(interpreter.tab_complete("ech"), "echo");
}

#[test]
fn player_operations_need_a_connection() {
    let mut interpreter = CommandInterpreter::new();
    let client = FakeClient::default();
    let log = Rc::clone(&client.log);
    let mut services = services_with(client);

    let err = interpreter
        .execute_line("play", &mut services)
        .expect_err("not connected");
    assert!(matches!(err, CommandError::ConnectionUnavailable));
    assert!(log.borrow().runs.is_empty());

    interpreter
        .execute_line("connect localhost 6600", &mut services)
        .expect("connect");
    interpreter.execute_line("play 3", &mut services).expect("play");
    interpreter
        .execute_line("previous", &mut services)
        .expect("previous");
    assert_eq!(log.borrow().runs, vec!["play 3".to_string(), "prev".to_string()]);
}

#[test]
fn startup_queue_runs_connects_first() {
    let mut interpreter = CommandInterpreter::new();
    let client = FakeClient::default();
    let log = Rc::clone(&client.log);
    let mut services = services_with(client);

    interpreter.set_queue_commands(true);
    for line in ["play", "set nopolling", "connect music.local 6601", "volume 50"] {
        interpreter
            .execute_line(line, &mut services)
            .expect("queued");
    }
    // Local commands run immediately; the rest wait.
    assert!(!services.settings.polling());
    assert_eq!(interpreter.queued_commands().len(), 3);
    assert!(log.borrow().connects.is_empty());

    let errors = interpreter.flush_queued_commands(&mut services);
    assert!(errors.is_empty());
    assert_eq!(
        log.borrow().connects,
        vec![("music.local".to_string(), 6601)]
    );
    assert_eq!(
        log.borrow().runs,
        vec!["play".to_string(), "volume 50".to_string()]
    );
    assert!(interpreter.queued_commands().is_empty());
}

#[test]
fn skipped_config_connects_leave_player_commands_queued() {
    let mut interpreter = CommandInterpreter::new();
    let client = FakeClient::default();
    let log = Rc::clone(&client.log);
    let mut services = services_with(client);
    services.settings.set_skip_config_connects(true);

    interpreter.set_queue_commands(true);
    interpreter
        .execute_line("connect elsewhere", &mut services)
        .expect("queued");
    interpreter
        .execute_line("play", &mut services)
        .expect("queued");
    let errors = interpreter.flush_queued_commands(&mut services);

    assert!(errors.is_empty());
    assert!(log.borrow().connects.is_empty());
    assert_eq!(interpreter.queued_commands().len(), 1);

    // A later interactive connect drains what is left.
    interpreter
        .execute_line("connect localhost", &mut services)
        .expect("connect");
    assert_eq!(log.borrow().runs, vec!["play".to_string()]);
    assert!(interpreter.queued_commands().is_empty());
}

#[test]
fn search_reports_the_first_match() {
    let mut interpreter = CommandInterpreter::new();
    let client = FakeClient::connected();
    client.log.borrow_mut().playlist =
        "Artist A - Intro\nArtist B - Song\nArtist C - Song Again\n".to_string();
    let mut services = services_with(client);

    interpreter
        .execute("search", "song", &mut services)
        .expect("search");
    assert_eq!(services.status.message(), Some("[1/2] 2: Artist B - Song"));

    interpreter
        .execute_line("searchnext", &mut services)
        .expect("next");
    assert_eq!(
        services.status.message(),
        Some("[2/2] 3: Artist C - Song Again")
    );
}

#[test]
fn quit_requests_shutdown() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());
    assert!(!services.shutdown.is_requested());
    interpreter.execute_line("q", &mut services).expect("quit");
    assert!(services.shutdown.is_requested());
}

#[test]
fn mpc_passthrough_needs_a_connection() {
    let mut interpreter = CommandInterpreter::new();
    let client = FakeClient::default();
    let log = Rc::clone(&client.log);
    let mut services = services_with(client);

    let err = interpreter
        .execute_line("mpc play", &mut services)
        .expect_err("not connected");
    assert!(matches!(err, CommandError::ConnectionUnavailable));
    assert!(log.borrow().runs.is_empty());
}

#[test]
fn startup_mpc_waits_for_the_connect() {
    let mut interpreter = CommandInterpreter::new();
    let client = FakeClient::default();
    let log = Rc::clone(&client.log);
    let mut services = services_with(client);

    interpreter.set_queue_commands(true);
    interpreter
        .execute_line("mpc volume 50", &mut services)
        .expect("queued");
    interpreter
        .execute_line("connect music.local 6601", &mut services)
        .expect("queued");
    assert!(log.borrow().runs.is_empty());
    assert!(log.borrow().connects.is_empty());

    let errors = interpreter.flush_queued_commands(&mut services);
    assert!(errors.is_empty());
    assert_eq!(
        log.borrow().connects,
        vec![("music.local".to_string(), 6601)]
    );
    assert_eq!(log.borrow().runs, vec!["volume 50".to_string()]);
    assert_eq!(services.output, vec!["ok: volume 50".to_string()]);
}

#[test]
fn set_applies_nothing_when_any_token_is_invalid() {
    let mut interpreter = CommandInterpreter::new();
    let mut services = services_with(FakeClient::default());

    let err = interpreter
        .execute_line("set nopolling bogus", &mut services)
        .expect_err("unknown option");
    assert!(matches!(err, CommandError::MalformedSetArgument(_)));
    assert!(services.settings.polling());

    interpreter
        .execute_line("set nopolling timeout=250", &mut services)
        .expect("valid tokens");
    assert!(!services.settings.polling());
    assert_eq!(services.settings.timeout_ms(), 250);
}

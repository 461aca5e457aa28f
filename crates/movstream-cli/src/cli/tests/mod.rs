//! CLI parse tests.

use super::{Cli, CliCommand, PrefsAction};
use clap::Parser;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn classify_with_hints() {
    match parse(&[
        "movstream",
        "classify",
        "https://h.test/dl",
        "--mime",
        "video/quicktime",
        "--filename",
        "a.mov",
    ]) {
        CliCommand::Classify { event } => {
            assert_eq!(event.url, "https://h.test/dl");
            assert_eq!(event.mime.as_deref(), Some("video/quicktime"));
            assert_eq!(event.filename.as_deref(), Some("a.mov"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn intercept_default_id() {
    match parse(&["movstream", "intercept", "https://h.test/a.mov"]) {
        CliCommand::Intercept { event, id } => {
            assert_eq!(id, 1);
            assert!(event.mime.is_none());
        }
        other => panic!("unexpected {other:?}"),
    }
    match parse(&["movstream", "intercept", "https://h.test/a.mov", "--id", "42"]) {
        CliCommand::Intercept { id, .. } => assert_eq!(id, 42),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn play_with_timeout() {
    match parse(&["movstream", "play", "player.html#x", "--timeout", "3"]) {
        CliCommand::Play { locator, timeout } => {
            assert_eq!(locator, "player.html#x");
            assert_eq!(timeout, Some(3));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn prefs_subcommands() {
    assert!(matches!(
        parse(&["movstream", "prefs", "show"]),
        CliCommand::Prefs {
            action: PrefsAction::Show
        }
    ));
    match parse(&["movstream", "prefs", "set", "useDarkTheme", "false"]) {
        CliCommand::Prefs {
            action: PrefsAction::Set { key, value },
        } => {
            assert_eq!(key, "useDarkTheme");
            assert_eq!(value, "false");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_url_is_rejected() {
    assert!(Cli::try_parse_from(["movstream", "classify"]).is_err());
}

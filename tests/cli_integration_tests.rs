//! Integration tests for the term-settings command-line surface.

use std::fs;

use clap::Parser;
use tempfile::tempdir;
use term_settings::cli::{Cli, Commands, run};

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

#[test]
fn check_accepts_explicit_files() {
    let cli = Cli::try_parse_from([
        "term-settings",
        "check",
        "--defaults",
        "d.json",
        "--user",
        "u.json",
    ])
    .unwrap();
    match cli.command {
        Commands::Check { defaults, user } => {
            assert_eq!(defaults.unwrap().to_str(), Some("d.json"));
            assert_eq!(user.unwrap().to_str(), Some("u.json"));
        }
        _ => panic!("expected check"),
    }
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["term-settings"]).is_err());
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_with_builtin_defaults_is_clean() {
    let temp = tempdir().unwrap();
    let user = temp.path().join("settings.json");
    fs::write(&user, "{}").unwrap();

    let mut out = Vec::new();
    let code = run(
        Commands::Check {
            defaults: None,
            user: Some(user),
        },
        &mut out,
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(code, 0);
    assert!(!text.contains("warning:"), "{text}");
    assert!(text.starts_with("ok: "), "{text}");
}

#[test]
fn check_reports_missing_profiles_as_fatal() {
    let temp = tempdir().unwrap();
    let defaults = temp.path().join("defaults.json");
    fs::write(&defaults, r#"{"schemes": [{"name": "Dark"}]}"#).unwrap();

    let mut out = Vec::new();
    let code = run(
        Commands::Check {
            defaults: Some(defaults),
            user: None,
        },
        &mut out,
    )
    .unwrap();
    assert_eq!(code, 1);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "error: no profiles are defined\n"
    );
}

#[test]
fn check_fails_on_unreadable_file() {
    let temp = tempdir().unwrap();
    let mut out = Vec::new();
    let result = run(
        Commands::Check {
            defaults: Some(temp.path().join("missing.json")),
            user: None,
        },
        &mut out,
    );
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read defaults"));
}

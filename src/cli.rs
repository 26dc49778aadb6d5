//! Command-line interface for term-settings.
//!
//! Each subcommand loads a settings snapshot, reports on it, and returns the
//! process exit code. Output goes to the given writer so the commands can be
//! driven from tests.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use term_settings_model::defaults::DEFAULTS_JSON;
use term_settings_model::{Settings, settings_path};

/// term-settings - Load, validate and rewrite layered terminal settings
#[derive(Parser)]
#[command(name = "term-settings")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set debug log level (overrides RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load settings and print every repair; exits 1 when they are unusable
    Check {
        /// Defaults document to use instead of the built-in one
        #[arg(long, value_name = "FILE")]
        defaults: Option<PathBuf>,

        /// User settings file to use instead of the configured one
        #[arg(long, value_name = "FILE")]
        user: Option<PathBuf>,
    },

    /// List profiles with their identity and origin
    Profiles {
        /// Include hidden profiles
        #[arg(long)]
        all: bool,
    },

    /// Print the settings that would be written back
    Diff,

    /// Write the repaired settings back to the settings file
    Normalize,
}

/// Run a subcommand and return the process exit code
pub fn run(command: Commands, out: &mut impl Write) -> Result<i32> {
    match command {
        Commands::Check { defaults, user } => {
            let settings = if defaults.is_none() && user.is_none() {
                Settings::load_all()?
            } else {
                load_files(defaults.as_deref(), user.as_deref())?
            };
            check(&settings, out)
        }
        Commands::Profiles { all } => with_usable(Settings::load_all()?, out, |s, out| {
            list_profiles(s, all, out)
        }),
        Commands::Diff => with_usable(Settings::load_all()?, out, |s, out| {
            writeln!(out, "{}", serde_json::to_string_pretty(&s.to_json()?)?)?;
            Ok(0)
        }),
        Commands::Normalize => with_usable(Settings::load_all()?, out, |s, out| {
            s.write_settings_to_disk()?;
            writeln!(out, "Wrote {}", settings_path().display())?;
            Ok(0)
        }),
    }
}

/// Load from explicit files. A missing `defaults` means the built-in
/// document; a missing `user` means no user settings.
fn load_files(defaults: Option<&Path>, user: Option<&Path>) -> Result<Settings> {
    let defaults_text = match defaults {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read defaults {}", path.display()))?,
        None => DEFAULTS_JSON.to_string(),
    };
    let user_text = user
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))
        })
        .transpose()?;
    Ok(Settings::from_json(&defaults_text, user_text.as_deref()))
}

fn report_fatal(settings: &Settings, out: &mut impl Write) -> Result<bool> {
    let Some(fatal) = settings.load_error() else {
        return Ok(false);
    };
    writeln!(out, "error: {fatal}")?;
    if let Some(message) = settings.deserialization_error_message() {
        writeln!(out, "  {message}")?;
    }
    Ok(true)
}

/// Run `f` only when the snapshot is usable; exit code 1 otherwise.
fn with_usable<W: Write>(
    settings: Settings,
    out: &mut W,
    f: impl FnOnce(&Settings, &mut W) -> Result<i32>,
) -> Result<i32> {
    if report_fatal(&settings, out)? {
        return Ok(1);
    }
    f(&settings, out)
}

fn check(settings: &Settings, out: &mut impl Write) -> Result<i32> {
    for warning in settings.warnings() {
        writeln!(out, "warning: {warning}")?;
    }
    if report_fatal(settings, out)? {
        return Ok(1);
    }
    writeln!(
        out,
        "ok: {} profiles ({} active), {} schemes, {} warnings",
        settings.all_profiles().len(),
        settings.active_profiles().len(),
        settings.color_schemes().len(),
        settings.warnings().len()
    )?;
    Ok(0)
}

fn list_profiles(settings: &Settings, all: bool, out: &mut impl Write) -> Result<i32> {
    let default = settings.default_profile().map(|p| p.guid());
    let profiles: Vec<_> = if all {
        settings.all_profiles().iter().collect()
    } else {
        settings.active_profiles()
    };
    for profile in profiles {
        let mut flags = String::new();
        if Some(profile.guid()) == default {
            flags.push_str(" (default)");
        }
        if profile.hidden() {
            flags.push_str(" (hidden)");
        }
        writeln!(
            out,
            "{}  {:<9}  {}{}",
            term_settings_model::format_guid(&profile.guid()),
            profile.origin(),
            profile.name(),
            flags
        )?;
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DEFAULTS: &str = r#"{
        "defaultProfile": "{00000000-0000-0000-0000-000000000001}",
        "schemes": [{"name": "Dark"}],
        "defaultColorScheme": "Dark",
        "profiles": [
            {"guid": "{00000000-0000-0000-0000-000000000001}", "name": "One"},
            {"guid": "{00000000-0000-0000-0000-000000000002}", "name": "Two", "hidden": true}
        ]
    }"#;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<i32>) -> (i32, String) {
        let mut buf = Vec::new();
        let code = f(&mut buf).unwrap();
        (code, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_check_reports_warnings() {
        let temp = tempdir().unwrap();
        let defaults = temp.path().join("defaults.json");
        let user = temp.path().join("settings.json");
        fs::write(&defaults, DEFAULTS).unwrap();
        fs::write(&user, r#"{"profiles": [{"name": "Mine", "colorScheme": "Gone"}]}"#).unwrap();

        let (code, text) = output(|out| {
            run(
                Commands::Check {
                    defaults: Some(defaults),
                    user: Some(user),
                },
                out,
            )
        });
        assert_eq!(code, 0);
        assert!(text.contains("warning: UnknownColorScheme in profile 'Mine'"), "{text}");
        assert!(text.contains("ok: 3 profiles (2 active), 1 schemes, 1 warnings"), "{text}");
    }

    #[test]
    fn test_check_fails_on_broken_user_file() {
        let temp = tempdir().unwrap();
        let user = temp.path().join("settings.json");
        fs::write(&user, "{ broken").unwrap();

        let (code, text) = output(|out| {
            run(
                Commands::Check {
                    defaults: None,
                    user: Some(user),
                },
                out,
            )
        });
        assert_eq!(code, 1);
        assert!(text.starts_with("error: failed to parse user settings"), "{text}");
    }

    #[test]
    fn test_list_profiles_marks_default_and_hidden() {
        let settings = Settings::from_json(DEFAULTS, None);
        let (_, active) = output(|out| list_profiles(&settings, false, out));
        assert_eq!(active.lines().count(), 1);
        assert!(active.contains("builtin    One (default)"), "{active}");

        let (_, all) = output(|out| list_profiles(&settings, true, out));
        assert!(all.contains("Two (hidden)"), "{all}");
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "term-settings",
            "profiles",
            "--all",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Profiles { all: true }));
        assert!(matches!(cli.log_level, Some(LogLevelArg::Debug)));
    }
}

//! Environment variable allowlist and path expansion for media paths.
//!
//! Background image paths may use `~` and `${VAR}` / `${VAR:-default}`.
//! Only allowlisted variables (and `TERM_SETTINGS_*` / `LC_*` prefixed ones)
//! are resolved, so a shared settings file cannot probe arbitrary variables
//! through the image path it points at.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

/// Matches `${VAR_NAME}` or `${VAR_NAME:-default_value}`.
static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-((?:[^}\\]|\\.)*))?}")
        .expect("env-var substitution regex is a compile-time constant and must be valid")
});

/// Environment variables that may be substituted in settings paths.
pub const ALLOWED_ENV_VARS: &[&str] = &[
    // User / home
    "HOME",
    "USER",
    "USERNAME",
    "USERPROFILE", // Windows
    // XDG directories
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "XDG_PICTURES_DIR",
    // System paths
    "TMPDIR",
    "TEMP",
    "TMP",
    // Windows paths
    "APPDATA",
    "LOCALAPPDATA",
    "ProgramData",
    "SystemRoot",
    "OneDrive",
];

/// Check whether a variable name is on the substitution allowlist.
pub fn is_env_var_allowed(var_name: &str) -> bool {
    ALLOWED_ENV_VARS.contains(&var_name)
        || var_name.starts_with("TERM_SETTINGS_")
        || var_name.starts_with("LC_")
}

/// Substitute `${VAR}` patterns with environment variable values.
///
/// - An unset variable uses its `:-default` when given, otherwise the
///   placeholder is left unchanged.
/// - `$${VAR}` is an escape and produces the literal `${VAR}`.
/// - Variables off the allowlist are left as-is and a warning is logged.
pub fn substitute_variables(input: &str) -> String {
    let escaped_placeholder = "\x00ESC_DOLLAR\x00";
    let working = input.replace("$${", escaped_placeholder);

    let result = ENV_VAR_PATTERN.replace_all(&working, |caps: &regex::Captures| {
        let var_name = &caps[1];

        if !is_env_var_allowed(var_name) {
            log::warn!(
                "Settings path references non-allowlisted environment variable ${{{var_name}}}; left as-is"
            );
            return caps[0].to_string();
        }

        match std::env::var(var_name) {
            Ok(val) => val,
            Err(_) => caps
                .get(2)
                .map(|m| m.as_str().replace("\\}", "}"))
                .unwrap_or_else(|| caps[0].to_string()),
        }
    });

    result.replace(escaped_placeholder, "${")
}

/// Expand a leading `~` and any `${VAR}` references in a path.
pub fn expand_path(path: &str) -> PathBuf {
    let substituted = substitute_variables(path.trim());
    if let Some(rest) = substituted
        .strip_prefix("~/")
        .or_else(|| substituted.strip_prefix("~\\"))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if substituted == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(substituted)
}

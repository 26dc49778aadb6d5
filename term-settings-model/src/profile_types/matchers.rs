//! Commandline matching used to pick a profile for a launch request.
//!
//! A request such as `wsl.exe -d Ubuntu --cd ~` is compared token by token
//! with each profile's commandline; the profile whose tokens form the longest
//! prefix of the request wins. Executables are compared by file name so that
//! `C:\Windows\System32\wsl.exe` and `wsl.exe` match.

use std::path::Path;

use super::profile::Profile;

/// Split a commandline into tokens.
///
/// Whitespace separates tokens and double quotes group them. Backslashes are
/// path separators, not escapes, so they are doubled before handing the text
/// to the POSIX splitter. Unbalanced quoting falls back to whitespace
/// splitting.
pub fn tokenize_commandline(commandline: &str) -> Vec<String> {
    let literal_backslashes = commandline.replace('\\', r"\\");
    shell_words::split(&literal_backslashes)
        .unwrap_or_else(|_| commandline.split_whitespace().map(str::to_string).collect())
}

fn executable_name(token: &str) -> String {
    let unixish = token.replace('\\', "/");
    Path::new(&unixish)
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| token.to_lowercase())
}

/// Number of leading tokens of `request` matched by `candidate`, or `None`
/// when `candidate` is not a prefix of `request`.
pub fn prefix_match_len(candidate: &[String], request: &[String]) -> Option<usize> {
    let (first, rest) = candidate.split_first()?;
    let (req_first, req_rest) = request.split_first()?;
    if executable_name(first) != executable_name(req_first) {
        return None;
    }
    if rest.len() > req_rest.len() {
        return None;
    }
    rest.iter()
        .zip(req_rest)
        .all(|(a, b)| a == b)
        .then_some(candidate.len())
}

/// The profile among `candidates` whose commandline is the longest prefix of
/// `commandline`. Ties keep the earliest profile.
pub fn best_commandline_match<'a>(
    candidates: impl IntoIterator<Item = &'a Profile>,
    commandline: &str,
) -> Option<&'a Profile> {
    let request = tokenize_commandline(commandline);
    let mut best: Option<(usize, &'a Profile)> = None;
    for profile in candidates {
        let Some(profile_commandline) = profile.commandline() else {
            continue;
        };
        let tokens = tokenize_commandline(&profile_commandline);
        if let Some(len) = prefix_match_len(&tokens, &request)
            && best.is_none_or(|(best_len, _)| len > best_len)
        {
            best = Some((len, profile));
        }
    }
    best.map(|(_, profile)| profile)
}

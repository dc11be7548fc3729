//! Build configuration file loading.
//!
//! The file is read whole, `$VAR` / `${VAR}` references are expanded from the
//! process environment, and the result is parsed as YAML. Resolution into
//! build definitions happens in the resolver, not here.

use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::domain::errors::ConfigError;

/// Read, expand and parse the configuration file at `path`.
pub fn load_build_file(path: &Path) -> Result<Value, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "config file read");
    parse_build_text(&raw, |name| std::env::var(name).ok())
}

/// Expand `text` with `lookup` and parse it as YAML.
pub fn parse_build_text<F>(text: &str, lookup: F) -> Result<Value, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = expand_env(text, lookup);
    Ok(serde_yaml::from_str(&expanded)?)
}

/// Shell-style variable expansion.
///
/// Unset variables expand to the empty string. A `$` not followed by a name
/// is kept as is. `${}` is dropped, and so is the `${` of an unclosed
/// reference; the text after it is kept.
pub fn expand_env<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        match reference(after) {
            Some((name, consumed)) => {
                if let Some(name) = name {
                    out.push_str(&lookup(name).unwrap_or_default());
                }
                rest = &after[consumed..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parse the reference following a `$`.
///
/// Returns the variable name (if well formed) and the number of bytes
/// consumed, or `None` when nothing after the `$` forms a reference.
fn reference(after: &str) -> Option<(Option<&str>, usize)> {
    let first = after.chars().next()?;

    if first == '{' {
        return Some(match after[1..].find('}') {
            Some(0) => (None, 2),
            Some(end) => (Some(&after[1..=end]), end + 2),
            // Unterminated: only the `${` is dropped.
            None => (None, 1),
        });
    }
    if is_special(first) {
        return Some((Some(&after[..1]), 1));
    }

    let len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(after.len());
    (len > 0).then(|| (Some(&after[..len]), len))
}

fn is_special(c: char) -> bool {
    matches!(c, '*' | '#' | '$' | '@' | '!' | '?' | '-') || c.is_ascii_digit()
}

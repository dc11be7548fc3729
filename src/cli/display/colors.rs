//! Status color mapping for CLI output.
//!
//! Coloring is disabled automatically when stderr is not a terminal or
//! `NO_COLOR` is set (handled by `console`).

use console::{style, StyledObject};

/// Pseudo-status printed when a build has just been started.
pub const STARTED: &str = "STARTED";

/// Color scheme:
/// - Green:  SUCCEEDED
/// - Blue:   IN_PROGRESS
/// - Cyan:   STARTED
/// - Red:    everything else
pub fn colorize_status(status: &str) -> StyledObject<&str> {
    match status {
        "SUCCEEDED" => style(status).green().bold(),
        "IN_PROGRESS" => style(status).blue(),
        STARTED => style(status).cyan(),
        _ => style(status).red().bold(),
    }
}

/// `<build id> [<STATUS>]`
pub fn status_line(build_id: &str, status: &str) -> String {
    format!("{build_id} [{}]", colorize_status(status).for_stderr())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_shape() {
        console::set_colors_enabled_stderr(false);
        assert_eq!(status_line("api:1", "FAILED"), "api:1 [FAILED]");
        assert_eq!(status_line("api:1", STARTED), "api:1 [STARTED]");
    }
}

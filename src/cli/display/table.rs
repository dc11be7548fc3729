//! Run summary table.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

use super::colors::colorize_status;
use crate::domain::models::RunOutcome;

/// Final status of every build in `outcome`, one row per build.
pub fn render_summary(outcome: &RunOutcome) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["BUILD ID", "STATUS"].map(|h| Cell::new(h).set_alignment(CellAlignment::Left)));

    for run in outcome.runs() {
        let status = run.status.as_ref().map_or("NOT_FOUND", |s| s.as_str());
        table.add_row([
            Cell::new(&run.id),
            Cell::new(colorize_status(status).for_stderr()),
        ]);
    }

    let verdict = if outcome.has_failure() {
        "some builds did not succeed"
    } else {
        "all builds succeeded"
    };
    format!("{table}\n{} build(s): {verdict}", outcome.runs().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BuildRun, BuildStatus};

    #[test]
    fn test_summary_lists_every_run() {
        console::set_colors_enabled_stderr(false);
        let mut outcome = RunOutcome::default();
        outcome.record([
            BuildRun {
                id: "api:1".to_string(),
                status: Some(BuildStatus::Succeeded),
            },
            BuildRun {
                id: "web:1".to_string(),
                status: None,
            },
        ]);

        let rendered = render_summary(&outcome);
        assert!(rendered.contains("api:1"));
        assert!(rendered.contains("SUCCEEDED"));
        assert!(rendered.contains("NOT_FOUND"));
        assert!(rendered.ends_with("2 build(s): some builds did not succeed"));
    }
}

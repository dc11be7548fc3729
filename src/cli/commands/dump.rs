//! `dump`: print the parsed config back as YAML.

use std::sync::Arc;

use anyhow::Result;

use crate::cli::context::CommandContext;
use crate::cli::types::ExitStatus;
use crate::domain::ports::{DiagnosticSink, TracingDiagnostics};
use crate::infrastructure::config::load_build_file;
use crate::services::{dump_config, ConfigResolver};

pub fn execute(ctx: &CommandContext) -> Result<ExitStatus> {
    let rendered = render(ctx.config_path(), Arc::new(TracingDiagnostics))?;
    print!("{rendered}");
    Ok(ExitStatus::Success)
}

/// Load, expand and re-serialize the config file at `path`.
pub fn render(path: &std::path::Path, diagnostics: Arc<dyn DiagnosticSink>) -> Result<String> {
    let document = load_build_file(path)?;
    let config = ConfigResolver::new(diagnostics).parse(&document)?;
    Ok(dump_config(&config)?)
}

//! Command-line interface.

pub mod commands;
pub mod context;
pub mod display;
pub mod types;

use anyhow::Result;
use tracing::debug;

pub use context::CommandContext;
pub use types::{Cli, Commands, ExitStatus, LogArgs, RetryArgs, RunArgs};

/// Route a parsed command to its handler.
///
/// `version` is normally answered before settings are loaded; it is handled
/// here too so every command has a single entry point.
pub async fn dispatch(command: Commands, ctx: &CommandContext) -> Result<ExitStatus> {
    match command {
        Commands::Run(args) => commands::run::execute(args, ctx).await,
        Commands::Retry(args) => commands::retry::execute(args, ctx).await,
        Commands::Log(args) => commands::log::execute(args, ctx).await,
        Commands::Dump => commands::dump::execute(ctx),
        Commands::Version => Ok(commands::version::execute()),
    }
}

/// Report a fatal error and pick the exit status for it.
pub fn handle_error(err: &anyhow::Error) -> ExitStatus {
    debug!(error = ?err, "command failed");
    eprintln!("{} {err:#}", console::style("Error:").red().bold());
    ExitStatus::Failure
}

//! codebuild-multirunner CLI entry point.

use clap::Parser;

use multirunner::cli::commands::version;
use multirunner::cli::{dispatch, handle_error, Cli, CommandContext, Commands, ExitStatus};
use multirunner::infrastructure::config::SettingsLoader;
use multirunner::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Version) {
        std::process::exit(version::execute().code());
    }

    let settings = match SettingsLoader::load(cli.settings.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {:#}", anyhow::Error::from(err));
            std::process::exit(ExitStatus::Failure.code());
        }
    };

    let logger = match LoggerImpl::init(&settings.logging) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Error: failed to initialize logging: {err:#}");
            std::process::exit(ExitStatus::Failure.code());
        }
    };

    let ctx = CommandContext::new(settings, cli.config);
    let status = match dispatch(cli.command, &ctx).await {
        Ok(status) => status,
        Err(err) => handle_error(&err),
    };

    // Flush the file writer before exiting.
    drop(logger);
    std::process::exit(status.code());
}

//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "codebuild-multirunner")]
#[command(
    about = "Start builds with overrides for multiple AWS CodeBuild projects at once",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// File path for the build config file
    #[arg(long, global = true, default_value = "./config.yaml")]
    pub config: PathBuf,

    /// Tool settings file (merged over .multirunner.yaml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run CodeBuild projects based on config
    Run(RunArgs),

    /// Retry a CodeBuild build with the given id
    Retry(RetryArgs),

    /// Print the CloudWatch log of a single build
    Log(LogArgs),

    /// Dump the resolved config for running CodeBuild projects
    Dump,

    /// Show current version
    Version,
}

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Do not follow build statuses after starting
    #[arg(long)]
    pub no_wait: bool,

    /// Polling span in seconds for build status checks
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub polling_span: Option<u64>,

    /// Groups to run (comma-separated, map format only)
    #[arg(long, value_delimiter = ',')]
    pub targets: Vec<String>,

    /// Stop waiting after this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_wait: Option<u64>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RetryArgs {
    /// CodeBuild build id to retry
    #[arg(long)]
    pub id: String,

    /// Do not follow the build status after retrying
    #[arg(long)]
    pub no_wait: bool,

    /// Polling span in seconds for build status checks
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub polling_span: Option<u64>,

    /// Stop waiting after this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_wait: Option<u64>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LogArgs {
    /// CodeBuild build id to print the log of
    #[arg(long)]
    pub id: String,
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// A build failed to start, or the command hit a fatal error.
    Failure,
    /// Every build started but at least one did not succeed.
    BuildFailure,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::BuildFailure => 2,
        }
    }

    pub fn from_failure(has_failure: bool) -> Self {
        if has_failure {
            Self::BuildFailure
        } else {
            Self::Success
        }
    }
}

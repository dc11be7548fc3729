//! `version`: print the version string.

use crate::cli::types::ExitStatus;

/// `<version> (Built on <date> from Git SHA <sha>)`
///
/// Date and SHA come from `MULTIRUNNER_BUILD_DATE` / `MULTIRUNNER_GIT_SHA`
/// at compile time.
pub fn version_string() -> String {
    format!(
        "{} (Built on {} from Git SHA {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("MULTIRUNNER_BUILD_DATE").unwrap_or("unknown"),
        option_env!("MULTIRUNNER_GIT_SHA").unwrap_or("none"),
    )
}

pub fn execute() -> ExitStatus {
    println!("{}", version_string());
    ExitStatus::Success
}

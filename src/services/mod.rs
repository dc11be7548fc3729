//! Build orchestration services.
//!
//! - ConfigResolver: builds section shape detection and target selection
//! - BuildLauncher: concurrent fan-out of StartBuild calls
//! - StatusPoller: batch status polling and outcome reduction
//! - RetryLauncher: retry a single build and optionally follow it
//! - LogTailer: follow a CloudWatch log stream to its end

pub mod build_launcher;
pub mod config_resolver;
pub mod log_tailer;
pub mod retry_launcher;
pub mod status_poller;

pub use build_launcher::{BuildLauncher, LaunchReport};
pub use config_resolver::{dump_config, select_builds, ConfigResolver, FLAT_FORMAT_DEPRECATION};
pub use log_tailer::{find_log_target, LogTailer};
pub use retry_launcher::{RetryLauncher, RetryReport};
pub use status_poller::{PollRound, PollerConfig, StatusPoller};

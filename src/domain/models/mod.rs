pub mod build_config;
pub mod build_override;
pub mod build_run;
pub mod log_stream;
pub mod start_request;

pub use build_config::{BuildConfig, ConfigDocument, TargetSelection};
pub use build_override::{
    ArtifactsOverride, BuildOverride, BuildStatusConfig, CacheOverride, CloudWatchLogsConfig,
    Compact, EnvironmentVariable, GitSubmodulesConfig, LogsConfig, RegistryCredential,
    S3LogsConfig, SourceAuth, SourceOverride, SourceVersion,
};
pub use build_run::{BuildEvent, BuildInfo, BuildRun, BuildStatus, LogsLocation, RunOutcome};
pub use log_stream::{LogEvent, LogPage, LogQuery, LogTarget};
pub use start_request::StartBuildRequest;

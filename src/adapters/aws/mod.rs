//! AWS JSON 1.1 HTTP adapters.
//!
//! Both services are reached through the same request shape: a `POST` to the
//! service endpoint with the operation named in `X-Amz-Target` and a JSON
//! body. Request signing is left to whatever sits at the configured endpoint
//! (a local emulator or a signing proxy).

pub mod codebuild;
pub mod logs;
pub mod transport;

pub use codebuild::CodeBuildClient;
pub use logs::CloudWatchLogsClient;
pub use transport::{AwsClientConfig, JsonTransport};

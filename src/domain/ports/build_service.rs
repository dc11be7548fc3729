//! Build service port - interface for the remote build service.

use async_trait::async_trait;

use crate::domain::errors::ServiceError;
use crate::domain::models::{BuildInfo, StartBuildRequest};

/// Remote capability for starting, retrying and inspecting builds.
///
/// Implementations own transport concerns (signing, timeouts, client-side
/// retries). The orchestration core only sees success or failure.
#[async_trait]
pub trait BuildService: Send + Sync {
    /// Start a build with the given overrides.
    async fn start_build(&self, request: &StartBuildRequest) -> Result<BuildInfo, ServiceError>;

    /// Retry an existing build. The service assigns a fresh build id.
    async fn retry_build(&self, build_id: &str) -> Result<BuildInfo, ServiceError>;

    /// Fetch the current state of several builds in a single request.
    ///
    /// Ids the service does not know are simply absent from the result.
    async fn batch_get_builds(&self, build_ids: &[String]) -> Result<Vec<BuildInfo>, ServiceError>;
}

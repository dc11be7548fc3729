//! Log service port - interface for the remote log store.

use async_trait::async_trait;

use crate::domain::errors::ServiceError;
use crate::domain::models::{LogPage, LogQuery};

/// Remote capability for reading log events page by page.
#[async_trait]
pub trait LogService: Send + Sync {
    async fn get_log_events(&self, query: &LogQuery) -> Result<LogPage, ServiceError>;
}

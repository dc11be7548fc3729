//! Adapters implementing the domain ports.
//!
//! - `aws`: HTTP clients for CodeBuild and CloudWatch Logs
//! - `mock`: in-memory fakes used by tests

pub mod aws;
pub mod mock;

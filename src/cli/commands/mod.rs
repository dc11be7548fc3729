//! CLI command implementations.

pub mod dump;
pub mod log;
pub mod retry;
pub mod run;
pub mod version;

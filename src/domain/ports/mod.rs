//! Port trait definitions (Hexagonal Architecture)
//!
//! The orchestration core depends only on these traits:
//! - BuildService: start, retry and batch status queries
//! - LogService: paginated log event retrieval
//! - DiagnosticSink: out-of-band warnings
//!
//! Adapters under `crate::adapters` provide the HTTP and in-memory
//! implementations.

pub mod build_service;
pub mod diagnostics;
pub mod log_service;

pub use build_service::BuildService;
pub use diagnostics::{CollectingDiagnostics, DiagnosticSink, TracingDiagnostics};
pub use log_service::LogService;

//! Diagnostic sink port.
//!
//! Non-fatal warnings (such as the legacy config format notice) go through
//! this sink instead of being written to a fixed stream, so tests can observe
//! them directly.

use std::sync::Mutex;

/// Receiver for out-of-band, non-fatal diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Sink that forwards warnings to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Sink that keeps every warning in memory.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn warn(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

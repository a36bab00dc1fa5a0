//! Error reporting collaborator for the repositories.

use std::error::Error;

/// Receives storage failures with their full internal detail.
///
/// Clients only ever see a generic message; this is where the cause goes.
pub trait ErrorLogger: Send + Sync {
    fn log_exception(&self, operation: &str, error: &(dyn Error + 'static));
}

/// Emits each failure as a `tracing` error event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {
    fn log_exception(&self, operation: &str, error: &(dyn Error + 'static)) {
        tracing::error!(operation, error = %error, details = ?error, "Product storage failure");
    }
}

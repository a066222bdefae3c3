//! Reporting of migration events
use log::{debug, error, info, warn};

/// Sink for the human readable events of a run
pub trait Reporter: Send + Sync {
    /// Detail only shown in debug mode
    fn debug(&self, message: &str);

    /// Progress information
    fn info(&self, message: &str);

    /// Something went wrong but the run continues unaffected
    fn warning(&self, message: &str);

    /// An operation failed
    fn error(&self, message: &str);

    /// An operation completed
    fn success(&self, message: &str);
}

/// [`Reporter`] writing to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn debug(&self, message: &str) {
        debug!("{message}");
    }

    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn warning(&self, message: &str) {
        warn!("⚠️  {message}");
    }

    fn error(&self, message: &str) {
        error!("❌ {message}");
    }

    fn success(&self, message: &str) {
        info!("✅ {message}");
    }
}

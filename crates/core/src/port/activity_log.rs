// Activity Log Port
// Append-only sink for human-readable reconciliation outcomes.

/// Activity log interface. One line per order outcome plus one summary line
/// per sweep; the engine skips calls entirely when activity logging is
/// disabled in the run configuration.
pub trait ActivityLog: Send + Sync {
    fn record(&self, message: &str);
}

/// Routes activity lines through tracing (production)
pub struct TracingActivityLog;

impl ActivityLog for TracingActivityLog {
    fn record(&self, message: &str) {
        tracing::info!(target: "paysweep::activity", "{}", message);
    }
}

/// Discards everything
pub struct NullActivityLog;

impl ActivityLog for NullActivityLog {
    fn record(&self, _message: &str) {}
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Captures recorded lines for assertions
    pub struct RecordingActivityLog {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingActivityLog {
        pub fn new() -> Self {
            Self {
                lines: Mutex::new(Vec::new()),
            }
        }

        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Default for RecordingActivityLog {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ActivityLog for RecordingActivityLog {
        fn record(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }
}

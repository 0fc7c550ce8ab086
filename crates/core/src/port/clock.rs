// Clock Port (for testability)

/// Clock interface (allows a fixed clock in tests)
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since epoch
    fn now_millis(&self) -> i64;
}

/// System clock (production)
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

pub mod mocks {
    use super::*;

    /// Fixed clock for deterministic lookback windows in tests
    pub struct FixedClock(pub i64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }
}

use std::time::Duration;

/// Timeouts applied to storage access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Pool acquire and SQLite busy timeout
    pub db_query: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            db_query: Duration::from_secs(10),
        }
    }
}

impl TimeoutConfig {
    pub fn with_db_query_secs(secs: u64) -> Self {
        Self {
            db_query: Duration::from_secs(secs),
        }
    }
}

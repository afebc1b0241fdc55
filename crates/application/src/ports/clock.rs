//! Clock port for history timestamps

use chrono::{DateTime, Utc};

/// Source of wall-clock time for stamping history entries.
///
/// Durations are measured with a monotonic clock inside the send use case;
/// this port only provides the calendar timestamp, so tests can pin it.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}

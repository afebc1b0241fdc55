//! System clock adapter

use chrono::{DateTime, Utc};
use snapdeck_application::ports::Clock;

/// Wall clock used to stamp history entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_utc_now() {
        let before = Utc::now();
        let now = SystemClock::new().now();
        assert!(now >= before);
        assert!(now <= Utc::now());
    }
}

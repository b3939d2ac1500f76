use chrono::Local;

/// Trait for abstracting time operations, enabling testability
pub trait Clock {
    /// Get the current Unix timestamp in seconds
    fn now_timestamp(&self) -> i64;
}

/// System clock implementation using real time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_timestamp(&self) -> i64 {
        Local::now().timestamp()
    }
}

/// A clock frozen at a given timestamp
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

#[cfg(test)]
impl Clock for FixedClock {
    fn now_timestamp(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_now_timestamp() {
        let clock = SystemClock;
        let ts = clock.now_timestamp();
        // Timestamp should be positive and reasonable (after year 2000)
        assert!(ts > 946684800); // Jan 1, 2000
    }

    #[test]
    fn test_fixed_clock_is_frozen() {
        let clock = FixedClock(1_700_000_000);
        assert_eq!(clock.now_timestamp(), 1_700_000_000);
    }
}

/// Wall-clock source for freshness checks.
///
/// The cache engine never reads ambient time; injecting the clock keeps TTL
/// boundaries deterministic under test.
pub trait Clock {
    /// Current time as Unix epoch seconds.
    fn now(&self) -> i64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

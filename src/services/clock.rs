use chrono::{DateTime, NaiveDate, Utc};
use std::sync::RwLock;

/// Source of "now" for numbering, conversion dates and monthly stats.
/// Injected so tests can pin the calendar.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn year(&self) -> i32 {
        use chrono::Datelike;
        self.today().year()
    }
}

/// Wall-clock implementation used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Parse from RFC 3339, panicking on malformed input (test helper).
    pub fn at(rfc3339: &str) -> Self {
        Self::new(
            DateTime::parse_from_rfc3339(rfc3339)
                .expect("valid RFC 3339 timestamp")
                .with_timezone(&Utc),
        )
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().expect("clock lock poisoned") = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock poisoned")
    }
}

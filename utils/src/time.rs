use chrono::{DateTime, Utc};

/// Fixed rendering format for record snapshots. Second precision; callers
/// that need the raw instant read the `DateTime` fields instead.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// Source of the current time, injected so lifecycle stamps are testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

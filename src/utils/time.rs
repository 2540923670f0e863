use std::time::Instant;
use chrono::{Local, NaiveDate};

/// Current calendar date in the host's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now_instant() -> Instant {
    Instant::now()
}

pub fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

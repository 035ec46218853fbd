/*
 * Wall-clock access for record headers, session banners and archive names
 *
 * All three renderings use unpadded numbers (`9:5:0`, not `09:05:00`), which
 * is the format existing log directories were written with.
 */

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};

/// Source of local calendar time.
pub trait Clock: Send {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the local system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        FixedClock(at)
    }

    /// Builds a clock from calendar fields, `None` if any field is out of range.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, min, sec))
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// `H:M:S`, used inside record headers
pub fn time_of_day(at: &NaiveDateTime) -> String {
    format!("{}:{}:{}", at.hour(), at.minute(), at.second())
}

/// `Y. M. D. H:M:S`, used in the session banner
pub fn calendar_stamp(at: &NaiveDateTime) -> String {
    format!(
        "{}. {}. {}. {}",
        at.year(),
        at.month(),
        at.day(),
        time_of_day(at)
    )
}

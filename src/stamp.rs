// used for the date-times that govern database records
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

// used to print out the canonical form of a stamp
use std::fmt;

/// Calendar date-time at second precision with a total order.
///
/// Stamps compare with local-time semantics: a stamp carrying an
/// explicit UTC offset is converted to local wall-clock time when
/// parsed, and stamps without an offset are taken as local time
/// already. The minimum useful stamp is [`Stamp::sentinel`]; dates
/// before it do not occur in any database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp(NaiveDateTime);

impl Stamp {
    /// 1995-01-01 00:00:00, the epoch of the database format.
    pub fn sentinel() -> Self {
        Stamp(
            NaiveDate::from_ymd_opt(1995, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    /// Builds a stamp from calendar components. `None` for invalid
    /// component combinations (month 13, hour 25, ...).
    pub fn from_ymd_hms(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, min, sec))
            .map(Stamp)
    }

    /// The current local wall-clock time.
    pub fn now() -> Self {
        Stamp(Local::now().naive_local())
    }

    /// Parses an SQL-style stamp `yyyy-mm-dd hh:mi:ss`, optionally
    /// followed by a numeric UTC offset which is folded into local time.
    pub fn parse_sql(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S %z") {
            return Some(Stamp(dt.with_timezone(&Local).naive_local()));
        }
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(Stamp)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The date packed as a YYYYMMDD integer, the encoding used by
    /// date-coded database subdirectories.
    pub fn date_code(&self) -> u32 {
        self.0.year() as u32 * 10_000 + self.0.month() * 100 + self.0.day()
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for Stamp {
    fn from(dt: NaiveDateTime) -> Self {
        Stamp(dt)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

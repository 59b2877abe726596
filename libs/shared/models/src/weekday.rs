use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed vocabulary of weekday identifiers shared by availability ingestion
/// and the date expansion. Both sides key on this enum, so a weekly record
/// and a calendar date can never disagree on spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Numeric index with 0 = Sunday, matching the backend's convention.
    pub fn number(self) -> u32 {
        match self {
            DayOfWeek::Sunday => 0,
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
        }
    }

    /// Canonical upper-case name, as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "SUNDAY",
            DayOfWeek::Monday => "MONDAY",
            DayOfWeek::Tuesday => "TUESDAY",
            DayOfWeek::Wednesday => "WEDNESDAY",
            DayOfWeek::Thursday => "THURSDAY",
            DayOfWeek::Friday => "FRIDAY",
            DayOfWeek::Saturday => "SATURDAY",
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDayName(pub String);

impl fmt::Display for UnknownDayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown day name: {}", self.0)
    }
}

impl std::error::Error for UnknownDayName {}

impl FromStr for DayOfWeek {
    type Err = UnknownDayName;

    /// Case-insensitive; the backend sends upper-case but older records vary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUNDAY" => Ok(DayOfWeek::Sunday),
            "MONDAY" => Ok(DayOfWeek::Monday),
            "TUESDAY" => Ok(DayOfWeek::Tuesday),
            "WEDNESDAY" => Ok(DayOfWeek::Wednesday),
            "THURSDAY" => Ok(DayOfWeek::Thursday),
            "FRIDAY" => Ok(DayOfWeek::Friday),
            "SATURDAY" => Ok(DayOfWeek::Saturday),
            other => Err(UnknownDayName(other.to_string())),
        }
    }
}

use crate::SpeedFormatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Time unit a speed is expressed in.
///
/// An absent unit (`None` where an `Option<TimeUnit>` is expected) behaves
/// like [`TimeUnit::Seconds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in seconds.
    pub const fn as_seconds(self) -> u64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => SECONDS_PER_MINUTE,
            TimeUnit::Hours => SECONDS_PER_HOUR,
            TimeUnit::Days => SECONDS_PER_DAY,
        }
    }

    /// Suffix appended to a rendered speed, e.g. `/min`.
    pub const fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "/s",
            TimeUnit::Minutes => "/min",
            TimeUnit::Hours => "/h",
            TimeUnit::Days => "/d",
        }
    }

    /// Parses a unit name, returning `None` for anything unrecognised so the
    /// caller falls back to seconds.
    pub fn parse_lenient(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

/// Converts elapsed seconds into the configured unit and returns the
/// matching suffix. Unspecified units scale as seconds.
pub fn scale(elapsed_seconds: f64, unit: Option<TimeUnit>) -> (f64, &'static str) {
    let unit = unit.unwrap_or_default();
    match unit {
        TimeUnit::Seconds => (elapsed_seconds, unit.suffix()),
        _ => (elapsed_seconds / unit.as_seconds() as f64, unit.suffix()),
    }
}

impl FromStr for TimeUnit {
    type Err = SpeedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(TimeUnit::Seconds),
            "m" | "min" | "mins" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hr" | "hour" | "hours" => Ok(TimeUnit::Hours),
            "d" | "day" | "days" => Ok(TimeUnit::Days),
            _ => Err(SpeedFormatError::UnknownTimeUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = SpeedFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeUnit> for String {
    fn from(unit: TimeUnit) -> Self {
        unit.to_string()
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Seconds => write!(f, "seconds"),
            TimeUnit::Minutes => write!(f, "minutes"),
            TimeUnit::Hours => write!(f, "hours"),
            TimeUnit::Days => write!(f, "days"),
        }
    }
}

//! Human readable durations such as `3d` or `12h`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use time::ext::NumericalStdDuration as _;

/// Units accepted in a duration string. Months and years are fixed at 30 and 365 days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    pub fn from_suffix(suffix: char) -> Option<Self> {
        let unit = match suffix {
            's' => Self::Second,
            'm' => Self::Minute,
            'h' => Self::Hour,
            'd' => Self::Day,
            'w' => Self::Week,
            'M' => Self::Month,
            'Y' => Self::Year,
            _ => return None,
        };
        Some(unit)
    }

    pub fn suffix(self) -> char {
        match self {
            Self::Second => 's',
            Self::Minute => 'm',
            Self::Hour => 'h',
            Self::Day => 'd',
            Self::Week => 'w',
            Self::Month => 'M',
            Self::Year => 'Y',
        }
    }

    pub fn std_duration(self) -> StdDuration {
        match self {
            Self::Second => 1.std_seconds(),
            Self::Minute => 1.std_minutes(),
            Self::Hour => 1.std_hours(),
            Self::Day => 1.std_days(),
            Self::Week => 1.std_weeks(),
            Self::Month => 30.std_days(),
            Self::Year => 365.std_days(),
        }
    }

    pub fn seconds(self) -> u64 {
        self.std_duration().as_secs()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration {0:?}, use <number><unit> where unit is one of s, m, h, d, w, M, Y (example: 30s, 1h, 3d)")]
    InvalidFormat(String),
    #[error("duration {0:?} is too large")]
    Overflow(String),
}

/// A human readable duration such as `3d` or `12h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Duration {
    value: u64,
    unit: Unit,
    seconds: u64,
}

impl Duration {
    pub fn new(value: u64, unit: Unit) -> Option<Self> {
        let seconds = value.checked_mul(unit.seconds())?;
        Some(Self {
            value,
            unit,
            seconds,
        })
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn as_secs(&self) -> u64 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0
    }

    pub fn std_duration(&self) -> StdDuration {
        StdDuration::from_secs(self.seconds)
    }
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationError::InvalidFormat(s.to_string());

        let mut chars = s.chars();
        let unit = chars
            .next_back()
            .and_then(Unit::from_suffix)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        // Only digits remain, so parsing can fail on overflow alone
        let overflow = || DurationError::Overflow(s.to_string());
        let value = digits.parse::<u64>().map_err(|_| overflow())?;
        Self::new(value, unit).ok_or_else(overflow)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl From<Duration> for StdDuration {
    fn from(duration: Duration) -> Self {
        duration.std_duration()
    }
}

/// Converts a duration string such as `3d` into seconds.
pub fn parse(s: &str) -> Result<u64, DurationError> {
    s.parse::<Duration>().map(|duration| duration.as_secs())
}

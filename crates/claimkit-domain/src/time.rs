//! Timestamps and their precision

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since the Unix epoch
///
/// Zero is the "unset" timestamp: time values holding it produce no claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Whether this is the unset timestamp
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Seconds since the epoch
    pub fn seconds(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How precisely a timestamp is known
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePrecision {
    /// Billions of years
    GigaYears,
    /// Hundreds of millions of years
    HundredMegaYears,
    /// Tens of millions of years
    TenMegaYears,
    /// Millions of years
    MegaYears,
    /// Hundreds of thousands of years
    HundredKiloYears,
    /// Tens of thousands of years
    TenKiloYears,
    /// Millennium
    KiloYears,
    /// Century
    HundredYears,
    /// Decade
    TenYears,
    /// Year
    Year,
    /// Month
    Month,
    /// Day
    Day,
    /// Hour
    Hour,
    /// Minute
    Minute,
    /// Second
    #[default]
    Second,
    /// Millisecond
    Millisecond,
    /// Microsecond
    Microsecond,
    /// Nanosecond
    Nanosecond,
}

impl TimePrecision {
    /// Get the precision name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePrecision::GigaYears => "gigayears",
            TimePrecision::HundredMegaYears => "hundredmegayears",
            TimePrecision::TenMegaYears => "tenmegayears",
            TimePrecision::MegaYears => "megayears",
            TimePrecision::HundredKiloYears => "hundredkiloyears",
            TimePrecision::TenKiloYears => "tenkiloyears",
            TimePrecision::KiloYears => "kiloyears",
            TimePrecision::HundredYears => "hundredyears",
            TimePrecision::TenYears => "tenyears",
            TimePrecision::Year => "year",
            TimePrecision::Month => "month",
            TimePrecision::Day => "day",
            TimePrecision::Hour => "hour",
            TimePrecision::Minute => "minute",
            TimePrecision::Second => "second",
            TimePrecision::Millisecond => "millisecond",
            TimePrecision::Microsecond => "microsecond",
            TimePrecision::Nanosecond => "nanosecond",
        }
    }

    /// Parse a precision name
    pub fn parse(s: &str) -> Option<Self> {
        const ALL: [TimePrecision; 18] = [
            TimePrecision::GigaYears,
            TimePrecision::HundredMegaYears,
            TimePrecision::TenMegaYears,
            TimePrecision::MegaYears,
            TimePrecision::HundredKiloYears,
            TimePrecision::TenKiloYears,
            TimePrecision::KiloYears,
            TimePrecision::HundredYears,
            TimePrecision::TenYears,
            TimePrecision::Year,
            TimePrecision::Month,
            TimePrecision::Day,
            TimePrecision::Hour,
            TimePrecision::Minute,
            TimePrecision::Second,
            TimePrecision::Millisecond,
            TimePrecision::Microsecond,
            TimePrecision::Nanosecond,
        ];
        let lower = s.to_lowercase();
        ALL.into_iter().find(|p| p.as_str() == lower)
    }
}

impl std::str::FromStr for TimePrecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid time precision: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_ordering() {
        assert!(TimePrecision::Year < TimePrecision::Day);
        assert!(TimePrecision::Second < TimePrecision::Nanosecond);
    }

    #[test]
    fn test_precision_parse() {
        assert_eq!(TimePrecision::parse("Day"), Some(TimePrecision::Day));
        assert_eq!("decade".parse::<TimePrecision>().ok(), None);
        assert_eq!(TimePrecision::default(), TimePrecision::Second);
    }

    #[test]
    fn test_zero_timestamp() {
        assert!(Timestamp::default().is_zero());
        assert!(!Timestamp(-1).is_zero());
    }
}

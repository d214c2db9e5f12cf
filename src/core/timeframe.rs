//! Lookback periods and their starting dates

use anyhow::Result;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    All,
    OneYear,
    ThreeMonths,
    #[default]
    OneMonth,
    TwoWeeks,
    OneWeek,
}

impl Timeframe {
    pub const VARIANTS: [Timeframe; 6] = [
        Timeframe::All,
        Timeframe::OneYear,
        Timeframe::ThreeMonths,
        Timeframe::OneMonth,
        Timeframe::TwoWeeks,
        Timeframe::OneWeek,
    ];
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Timeframe::All => "All",
                Timeframe::OneYear => "1Y",
                Timeframe::ThreeMonths => "3M",
                Timeframe::OneMonth => "1M",
                Timeframe::TwoWeeks => "2W",
                Timeframe::OneWeek => "1W",
            }
        )
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(Timeframe::All),
            "1Y" => Ok(Timeframe::OneYear),
            "3M" => Ok(Timeframe::ThreeMonths),
            "1M" => Ok(Timeframe::OneMonth),
            "2W" => Ok(Timeframe::TwoWeeks),
            "1W" => Ok(Timeframe::OneWeek),
            _ => Err(anyhow::anyhow!("Invalid timeframe: {}", s)),
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(value: Timeframe) -> Self {
        value.to_string()
    }
}

/// Maps a timeframe to the unix timestamp where its lookback window begins.
pub trait TimeframeTable: Send + Sync {
    fn starting_date(&self, timeframe: Timeframe, now: DateTime<Utc>) -> i64;
}

/// Calendar lookback: `now` minus the period, truncated to the start of that
/// UTC day. `All` starts at the epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalendarTimeframes;

impl TimeframeTable for CalendarTimeframes {
    fn starting_date(&self, timeframe: Timeframe, now: DateTime<Utc>) -> i64 {
        let start = match timeframe {
            Timeframe::All => return 0,
            Timeframe::OneYear => now.checked_sub_months(Months::new(12)),
            Timeframe::ThreeMonths => now.checked_sub_months(Months::new(3)),
            Timeframe::OneMonth => now.checked_sub_months(Months::new(1)),
            Timeframe::TwoWeeks => now.checked_sub_signed(Duration::weeks(2)),
            Timeframe::OneWeek => now.checked_sub_signed(Duration::weeks(1)),
        };

        start
            .and_then(|dt| dt.date_naive().and_hms_opt(0, 0, 0))
            .map_or(0, |midnight| midnight.and_utc().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timeframe_parse_and_display() {
        for timeframe in Timeframe::VARIANTS {
            let parsed: Timeframe = timeframe.to_string().parse().unwrap();
            assert_eq!(parsed, timeframe);
        }
        assert_eq!("all".parse::<Timeframe>().unwrap(), Timeframe::All);
        assert_eq!(" 3m ".parse::<Timeframe>().unwrap(), Timeframe::ThreeMonths);

        let err = "5D".parse::<Timeframe>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid timeframe: 5D");
    }

    #[test]
    fn test_timeframe_serde() {
        let parsed: Timeframe = serde_yaml::from_str("\"2W\"").unwrap();
        assert_eq!(parsed, Timeframe::TwoWeeks);
        assert!(serde_yaml::from_str::<Timeframe>("\"6M\"").is_err());
    }

    #[test]
    fn test_calendar_starting_dates() {
        let table = CalendarTimeframes;
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 15, 30, 0).unwrap();
        let day = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap().timestamp();

        assert_eq!(table.starting_date(Timeframe::All, now), 0);
        assert_eq!(table.starting_date(Timeframe::OneYear, now), day(2023, 3, 31));
        assert_eq!(table.starting_date(Timeframe::ThreeMonths, now), day(2023, 12, 31));
        // Month end clamps to the shorter month
        assert_eq!(table.starting_date(Timeframe::OneMonth, now), day(2024, 2, 29));
        assert_eq!(table.starting_date(Timeframe::TwoWeeks, now), day(2024, 3, 17));
        assert_eq!(table.starting_date(Timeframe::OneWeek, now), day(2024, 3, 24));
    }
}

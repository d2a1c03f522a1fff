//! Timeframes and calendar bucket keys

use crate::error::SeriesError;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling granularity a series is displayed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// Native daily observations (no aggregation)
    #[default]
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Timeframe {
    /// Returns all available timeframes from finest to coarsest.
    pub fn all() -> &'static [Timeframe] {
        &[
            Timeframe::Daily,
            Timeframe::Weekly,
            Timeframe::Monthly,
            Timeframe::Quarterly,
            Timeframe::Yearly,
        ]
    }

    /// Returns the lowercase name of this timeframe.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
            Timeframe::Quarterly => "quarterly",
            Timeframe::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Timeframe::Daily),
            "weekly" | "week" | "w" => Ok(Timeframe::Weekly),
            "monthly" | "month" | "m" => Ok(Timeframe::Monthly),
            "quarterly" | "quarter" | "q" => Ok(Timeframe::Quarterly),
            "yearly" | "year" | "annual" | "y" => Ok(Timeframe::Yearly),
            other => Err(SeriesError::InvalidInput(format!(
                "Unsupported timeframe: {}",
                other
            ))),
        }
    }
}

/// Calendar bucket a date falls into for a given timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeframeBucketKey {
    /// ISO week, keyed by its Monday
    Week(NaiveDate),
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year(i32),
}

impl fmt::Display for TimeframeBucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeframeBucketKey::Week(start) => write!(f, "{}", start.format("%Y-%m-%d")),
            TimeframeBucketKey::Month { year, month } => write!(f, "{}-{:02}", year, month),
            TimeframeBucketKey::Quarter { year, quarter } => write!(f, "{}-Q{}", year, quarter),
            TimeframeBucketKey::Year(year) => write!(f, "{}", year),
        }
    }
}

/// Bucket key of `date` at `timeframe`, or `None` for daily data.
pub fn bucket_key(date: NaiveDate, timeframe: Timeframe) -> Option<TimeframeBucketKey> {
    match timeframe {
        Timeframe::Daily => None,
        Timeframe::Weekly => {
            let offset = date.weekday().num_days_from_monday() as i64;
            Some(TimeframeBucketKey::Week(date - Duration::days(offset)))
        }
        Timeframe::Monthly => Some(TimeframeBucketKey::Month {
            year: date.year(),
            month: date.month(),
        }),
        Timeframe::Quarterly => Some(TimeframeBucketKey::Quarter {
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
        }),
        Timeframe::Yearly => Some(TimeframeBucketKey::Year(date.year())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2024-01-04 is a Thursday, 2024-01-01 a Monday
        assert_eq!(
            bucket_key(day(2024, 1, 4), Timeframe::Weekly),
            Some(TimeframeBucketKey::Week(day(2024, 1, 1)))
        );
        // Sunday still belongs to the week that started the previous Monday
        assert_eq!(
            bucket_key(day(2024, 1, 7), Timeframe::Weekly),
            Some(TimeframeBucketKey::Week(day(2024, 1, 1)))
        );
    }

    #[test]
    fn test_week_spanning_year_boundary() {
        assert_eq!(
            bucket_key(day(2025, 1, 1), Timeframe::Weekly),
            Some(TimeframeBucketKey::Week(day(2024, 12, 30)))
        );
    }

    #[test]
    fn test_quarter_keys() {
        assert_eq!(
            bucket_key(day(2023, 3, 31), Timeframe::Quarterly),
            Some(TimeframeBucketKey::Quarter { year: 2023, quarter: 1 })
        );
        assert_eq!(
            bucket_key(day(2023, 10, 1), Timeframe::Quarterly),
            Some(TimeframeBucketKey::Quarter { year: 2023, quarter: 4 })
        );
    }

    #[test]
    fn test_daily_has_no_bucket() {
        assert_eq!(bucket_key(day(2023, 1, 1), Timeframe::Daily), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Quarterly".parse::<Timeframe>().unwrap(), Timeframe::Quarterly);
        assert_eq!(Timeframe::Monthly.to_string(), "monthly");
        assert!("hourly".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_bucket_key_display() {
        let key = bucket_key(day(2023, 5, 9), Timeframe::Quarterly).unwrap();
        assert_eq!(key.to_string(), "2023-Q2");
        let key = bucket_key(day(2023, 5, 9), Timeframe::Monthly).unwrap();
        assert_eq!(key.to_string(), "2023-05");
    }
}

//! How much history to request and at what granularity.

use chrono::Duration;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HistoryPeriod {
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
}

impl HistoryPeriod {
    pub const ALL: [HistoryPeriod; 7] = [
        HistoryPeriod::FiveDays,
        HistoryPeriod::OneMonth,
        HistoryPeriod::ThreeMonths,
        HistoryPeriod::SixMonths,
        HistoryPeriod::OneYear,
        HistoryPeriod::TwoYears,
        HistoryPeriod::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::FiveDays => "5d",
            HistoryPeriod::OneMonth => "1mo",
            HistoryPeriod::ThreeMonths => "3mo",
            HistoryPeriod::SixMonths => "6mo",
            HistoryPeriod::OneYear => "1y",
            HistoryPeriod::TwoYears => "2y",
            HistoryPeriod::FiveYears => "5y",
        }
    }

    /// Calendar span of the period. Months count as 30 days, years as 365.
    pub fn span(&self) -> Duration {
        match self {
            HistoryPeriod::FiveDays => Duration::days(5),
            HistoryPeriod::OneMonth => Duration::days(30),
            HistoryPeriod::ThreeMonths => Duration::days(90),
            HistoryPeriod::SixMonths => Duration::days(180),
            HistoryPeriod::OneYear => Duration::days(365),
            HistoryPeriod::TwoYears => Duration::days(730),
            HistoryPeriod::FiveYears => Duration::days(1825),
        }
    }
}

impl FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        HistoryPeriod::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown period '{s}'"))
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleInterval {
    OneMinute,
    TwoMinutes,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    SixtyMinutes,
    #[default]
    OneDay,
    OneWeek,
}

impl SampleInterval {
    pub const ALL: [SampleInterval; 8] = [
        SampleInterval::OneMinute,
        SampleInterval::TwoMinutes,
        SampleInterval::FiveMinutes,
        SampleInterval::FifteenMinutes,
        SampleInterval::ThirtyMinutes,
        SampleInterval::SixtyMinutes,
        SampleInterval::OneDay,
        SampleInterval::OneWeek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SampleInterval::OneMinute => "1m",
            SampleInterval::TwoMinutes => "2m",
            SampleInterval::FiveMinutes => "5m",
            SampleInterval::FifteenMinutes => "15m",
            SampleInterval::ThirtyMinutes => "30m",
            SampleInterval::SixtyMinutes => "60m",
            SampleInterval::OneDay => "1d",
            SampleInterval::OneWeek => "1wk",
        }
    }

    /// Bars finer than one day.
    pub fn is_intraday(&self) -> bool {
        !matches!(self, SampleInterval::OneDay | SampleInterval::OneWeek)
    }
}

impl FromStr for SampleInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        SampleInterval::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| format!("unknown interval '{s}'"))
    }
}

impl fmt::Display for SampleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryRequest {
    pub period: HistoryPeriod,
    pub interval: SampleInterval,
}

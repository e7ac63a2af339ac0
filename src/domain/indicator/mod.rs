//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values, aligned to its prices

pub mod rsi;
pub mod sma;

use crate::domain::price_series::PriceSeries;
use chrono::NaiveDateTime;
use std::fmt;

/// One aligned output value. `valid == false` means "not yet available";
/// the stored number is then meaningless and always 0.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub valid: bool,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn defined(timestamp: NaiveDateTime, value: f64) -> Self {
        Self {
            timestamp,
            valid: true,
            value,
        }
    }

    pub fn undefined(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            valid: false,
            value: 0.0,
        }
    }

    pub fn get(&self) -> Option<f64> {
        self.valid.then_some(self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// A series with every point undefined, aligned to `series`.
    pub fn all_undefined(indicator_type: IndicatorType, series: &PriceSeries) -> Self {
        Self {
            indicator_type,
            values: series
                .bars()
                .iter()
                .map(|b| IndicatorPoint::undefined(b.timestamp))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(IndicatorPoint::get)
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().and_then(IndicatorPoint::get)
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|p| p.valid).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

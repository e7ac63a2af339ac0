//! CSV export of an indicator frame.
//!
//! One row per bar. Undefined indicator values are written as empty cells.

use crate::domain::error::TickerscopeError;
use crate::domain::frame::IndicatorFrame;
use crate::domain::signal::{SignalPolicy, signal_history};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 10] = [
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "sma_short",
    "sma_long",
    "rsi",
    "signal",
];

pub fn write_frame_csv<W: Write>(
    frame: &IndicatorFrame,
    policy: &SignalPolicy,
    writer: W,
) -> Result<(), TickerscopeError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    let signals = signal_history(frame, policy);
    for (row, decision) in frame.rows().zip(&signals) {
        let bar = row.bar;
        wtr.write_record([
            bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            optional(row.sma_short),
            optional(row.sma_long),
            optional(row.rsi),
            decision.signal.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_frame_to_path(
    frame: &IndicatorFrame,
    policy: &SignalPolicy,
    path: &Path,
) -> Result<(), TickerscopeError> {
    let file = File::create(path)?;
    write_frame_csv(frame, policy, file)
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::IndicatorParams;
    use crate::domain::indicator::rsi::ZeroLossPolicy;
    use crate::domain::price_series::{PriceBar, PriceSeries};
    use chrono::{Duration, NaiveDate};

    fn make_frame(prices: &[f64]) -> IndicatorFrame {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10.0,
            })
            .collect();
        let series = PriceSeries::new("AAPL", bars).unwrap();
        let params = IndicatorParams {
            sma_short: 2,
            sma_long: 3,
            rsi_period: 2,
            zero_loss: ZeroLossPolicy::Clamp,
        };
        IndicatorFrame::compute(&series, &params)
    }

    #[test]
    fn writes_header_and_one_row_per_bar() {
        let frame = make_frame(&[10.0, 12.0, 11.0, 14.0]);
        let mut out = Vec::new();
        write_frame_csv(&frame, &SignalPolicy::crossover(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "timestamp,open,high,low,close,volume,sma_short,sma_long,rsi,signal"
        );
        assert_eq!(lines[1], "2024-01-01 00:00:00,10,11,9,10,10,,,,HOLD");
        assert!(lines[2].starts_with("2024-01-02 00:00:00,12,13,11,12,10,11,,,"));
    }

    #[test]
    fn defined_values_are_written() {
        let frame = make_frame(&[10.0, 12.0, 11.0, 14.0]);
        let mut out = Vec::new();
        write_frame_csv(&frame, &SignalPolicy::crossover(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let last: Vec<&str> = text.lines().last().unwrap().split(',').collect();
        assert_eq!(last[6], "12.5");
        assert_eq!(last[8], "75");
    }

    #[test]
    fn export_to_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("AAPL_data.csv");
        let frame = make_frame(&[10.0, 11.0]);

        export_frame_to_path(&frame, &SignalPolicy::trend_momentum(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}

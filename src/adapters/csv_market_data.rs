//! CSV file market data adapter.
//!
//! Reads `<dir>/<SYMBOL>_<interval>.csv`, falling back to `<dir>/<SYMBOL>.csv`.
//! Exported price files disagree on header casing and on which columns exist,
//! so headers are normalised here and every file comes out as the same
//! validated [`PriceSeries`].

use crate::domain::error::DataError;
use crate::domain::history::HistoryRequest;
use crate::domain::price_series::{PriceBar, PriceSeries};
use crate::ports::data_port::MarketDataPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

const TIME_COLUMNS: [&str; 4] = ["date", "datetime", "timestamp", "time"];

pub struct CsvMarketData {
    base_path: PathBuf,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn candidate_paths(&self, symbol: &str, request: &HistoryRequest) -> [PathBuf; 2] {
        [
            self.base_path
                .join(format!("{}_{}.csv", symbol, request.interval)),
            self.base_path.join(format!("{}.csv", symbol)),
        ]
    }

    fn read_source(&self, symbol: &str, request: &HistoryRequest) -> Result<String, DataError> {
        for path in self.candidate_paths(symbol, request) {
            match fs::read_to_string(&path) {
                Ok(content) => {
                    debug!(symbol, path = %path.display(), "reading price file");
                    return Ok(content);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(DataError::Malformed {
                        symbol: symbol.to_string(),
                        reason: format!("failed to read {}: {}", path.display(), e),
                    });
                }
            }
        }
        Err(DataError::NoData {
            symbol: symbol.to_string(),
        })
    }
}

impl MarketDataPort for CsvMarketData {
    fn fetch_prices(&self, symbol: &str, request: &HistoryRequest) -> Result<PriceSeries, DataError> {
        let content = self.read_source(symbol, request)?;
        let mut bars = parse_bars(symbol, &content)?;

        bars.sort_by_key(|b| b.timestamp);
        if let Some(last) = bars.last() {
            let cutoff = last.timestamp - request.period.span();
            bars.retain(|b| b.timestamp > cutoff);
        }

        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }
        debug!(
            symbol,
            bars = bars.len(),
            interval = %request.interval,
            intraday = request.interval.is_intraday(),
            "price series loaded"
        );
        PriceSeries::new(symbol, bars)
    }
}

/// Column positions found in a header row.
struct Columns {
    time: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(symbol: &str, headers: &csv::StringRecord) -> Result<Self, DataError> {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |wanted: &str| names.iter().position(|n| n == wanted);
        let missing = |column: &str| DataError::Malformed {
            symbol: symbol.to_string(),
            reason: format!("missing {} column", column),
        };

        let time = TIME_COLUMNS
            .into_iter()
            .find_map(|c| find(c))
            .ok_or_else(|| missing("date"))?;
        let close = find("close").ok_or_else(|| missing("close"))?;

        Ok(Self {
            time,
            close,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
        })
    }

    fn present(&self) -> impl Iterator<Item = usize> + '_ {
        [Some(self.time), Some(self.close), self.open, self.high, self.low, self.volume]
            .into_iter()
            .flatten()
    }
}

fn parse_bars(symbol: &str, content: &str) -> Result<Vec<PriceBar>, DataError> {
    let malformed = |reason: String| DataError::Malformed {
        symbol: symbol.to_string(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| malformed(format!("CSV header error: {}", e)))?
        .clone();
    let columns = Columns::from_headers(symbol, &headers)?;

    let mut bars = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let record = result.map_err(|e| malformed(format!("CSV parse error: {}", e)))?;

        let complete = columns
            .present()
            .all(|i| record.get(i).is_some_and(|cell| !cell.is_empty()));
        if !complete {
            dropped += 1;
            continue;
        }

        let cell = |i: usize| record.get(i).unwrap_or_default();
        let number = |i: usize, name: &str| -> Result<f64, DataError> {
            cell(i)
                .parse::<f64>()
                .map_err(|e| malformed(format!("invalid {} value '{}': {}", name, cell(i), e)))
        };

        let timestamp = parse_timestamp(cell(columns.time))
            .ok_or_else(|| malformed(format!("invalid timestamp '{}'", cell(columns.time))))?;
        let close = number(columns.close, "close")?;
        let open = columns.open.map(|i| number(i, "open")).transpose()?;
        let high = columns.high.map(|i| number(i, "high")).transpose()?;
        let low = columns.low.map(|i| number(i, "low")).transpose()?;
        let volume = columns.volume.map(|i| number(i, "volume")).transpose()?;

        bars.push(PriceBar {
            timestamp,
            open: open.unwrap_or(close),
            high: high.unwrap_or(close),
            low: low.unwrap_or(close),
            close,
            volume: volume.unwrap_or(0.0),
        });
    }

    if dropped > 0 {
        debug!(symbol, dropped, "dropped incomplete rows");
    }
    Ok(bars)
}

/// Accepts plain dates, naive date-times, and date-times with a UTC offset.
/// Offset-bearing values keep their local wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

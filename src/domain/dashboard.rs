//! Per-symbol evaluation: fetch, compute, classify, summarise.
//!
//! A failing symbol never aborts the batch; it is reported as
//! [`SymbolOutcome::Unavailable`] next to the symbols that succeeded.

use crate::domain::error::DataError;
use crate::domain::frame::{IndicatorFrame, IndicatorParams};
use crate::domain::history::HistoryRequest;
use crate::domain::signal::{Signal, SignalDecision, SignalPolicy, classify_signal};
use crate::ports::data_port::MarketDataPort;
use tracing::{debug, info, warn};

/// What the presentation layer shows for one symbol.
#[derive(Debug, Clone)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub latest_price: f64,
    pub percent_change: f64,
    pub decision: SignalDecision,
    pub rsi: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub frame: IndicatorFrame,
}

impl SymbolSnapshot {
    /// Builds the snapshot from a computed frame. `None` for an empty frame.
    pub fn from_frame(frame: IndicatorFrame, policy: &SignalPolicy) -> Option<Self> {
        let decision = classify_signal(&frame, policy);
        let (latest_price, rsi, sma_short, sma_long) = {
            let latest = frame.latest()?;
            (latest.close(), latest.rsi, latest.sma_short, latest.sma_long)
        };
        let percent_change = frame.series().percent_change()?;

        Some(Self {
            symbol: frame.symbol().to_string(),
            latest_price,
            percent_change,
            decision,
            rsi,
            sma_short,
            sma_long,
            frame,
        })
    }

    pub fn signal(&self) -> Signal {
        self.decision.signal
    }
}

#[derive(Debug, Clone)]
pub enum SymbolOutcome {
    Ready(Box<SymbolSnapshot>),
    Unavailable(DataError),
}

impl SymbolOutcome {
    pub fn snapshot(&self) -> Option<&SymbolSnapshot> {
        match self {
            SymbolOutcome::Ready(snapshot) => Some(snapshot.as_ref()),
            SymbolOutcome::Unavailable(_) => None,
        }
    }
}

/// Tally of a report: buys, sells, holds and unavailable symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalCounts {
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
    pub unavailable: usize,
}

/// Outcomes in the order the symbols were requested.
#[derive(Debug, Clone, Default)]
pub struct DashboardReport {
    pub entries: Vec<(String, SymbolOutcome)>,
}

impl DashboardReport {
    pub fn get(&self, symbol: &str) -> Option<&SymbolOutcome> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, outcome)| outcome)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn counts(&self) -> SignalCounts {
        let mut counts = SignalCounts::default();
        for (_, outcome) in &self.entries {
            match outcome.snapshot().map(SymbolSnapshot::signal) {
                Some(Signal::Buy) => counts.buy += 1,
                Some(Signal::Sell) => counts.sell += 1,
                Some(Signal::Hold) => counts.hold += 1,
                None => counts.unavailable += 1,
            }
        }
        counts
    }
}

pub fn evaluate_symbol(
    port: &dyn MarketDataPort,
    symbol: &str,
    request: &HistoryRequest,
    params: &IndicatorParams,
    policy: &SignalPolicy,
) -> SymbolOutcome {
    let series = match port.fetch_prices(symbol, request) {
        Ok(series) => series,
        Err(e) => {
            warn!(symbol, error = %e, "data unavailable");
            return SymbolOutcome::Unavailable(e);
        }
    };

    debug!(symbol, bars = series.len(), "computing indicators");
    let frame = IndicatorFrame::compute(&series, params);

    match SymbolSnapshot::from_frame(frame, policy) {
        Some(snapshot) => {
            debug!(
                symbol,
                signal = %snapshot.decision.signal,
                reason = %snapshot.decision.reason,
                "classified"
            );
            SymbolOutcome::Ready(Box::new(snapshot))
        }
        None => {
            warn!(symbol, "data source returned an empty series");
            SymbolOutcome::Unavailable(DataError::NoData {
                symbol: symbol.to_string(),
            })
        }
    }
}

pub fn evaluate_universe(
    port: &dyn MarketDataPort,
    symbols: &[String],
    request: &HistoryRequest,
    params: &IndicatorParams,
    policy: &SignalPolicy,
) -> DashboardReport {
    let entries: Vec<(String, SymbolOutcome)> = symbols
        .iter()
        .map(|symbol| {
            let outcome = evaluate_symbol(port, symbol, request, params, policy);
            (symbol.clone(), outcome)
        })
        .collect();

    let report = DashboardReport { entries };
    let counts = report.counts();
    info!(
        symbols = report.len(),
        buy = counts.buy,
        sell = counts.sell,
        hold = counts.hold,
        unavailable = counts.unavailable,
        "scan complete"
    );
    report
}

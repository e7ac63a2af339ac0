//! Plain-text rendering of dashboard results for the terminal.

use crate::domain::dashboard::{DashboardReport, SymbolOutcome, SymbolSnapshot};
use crate::domain::frame::IndicatorFrame;
use crate::domain::signal::{SignalPolicy, signal_history};
use std::fmt::Write;

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

/// One line per symbol plus a tally line.
pub fn format_dashboard(report: &DashboardReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>12} {:>9} {:<6} {:>6} {:>12} {:>12}  {}",
        "SYMBOL", "PRICE", "CHANGE", "SIGNAL", "RSI", "SMA SHORT", "SMA LONG", "REASON"
    );

    for (symbol, outcome) in &report.entries {
        match outcome {
            SymbolOutcome::Ready(snap) => {
                let _ = writeln!(out, "{}", format_snapshot_line(snap));
            }
            SymbolOutcome::Unavailable(e) => {
                let _ = writeln!(out, "{:<10} {:>12} {}", symbol, "n/a", e.label());
            }
        }
    }

    let counts = report.counts();
    let _ = writeln!(
        out,
        "\n{} symbols: {} buy, {} sell, {} hold, {} unavailable",
        report.len(),
        counts.buy,
        counts.sell,
        counts.hold,
        counts.unavailable
    );
    out
}

fn format_snapshot_line(snap: &SymbolSnapshot) -> String {
    format!(
        "{:<10} {:>12.2} {:>8.2}% {:<6} {:>6} {:>12} {:>12}  {}",
        snap.symbol,
        snap.latest_price,
        snap.percent_change,
        snap.decision.signal.to_string(),
        fmt_opt(snap.rsi, 1),
        fmt_opt(snap.sma_short, 2),
        fmt_opt(snap.sma_long, 2),
        snap.decision.reason
    )
}

/// Header block for one symbol followed by its newest `max_points` rows.
pub fn format_detail(snap: &SymbolSnapshot, policy: &SignalPolicy, max_points: usize) -> String {
    let mut out = String::new();
    let params = snap.frame.params();
    let _ = writeln!(out, "== {} ==", snap.symbol);
    let _ = writeln!(
        out,
        "Last price: {:.2} ({:+.2}%)",
        snap.latest_price, snap.percent_change
    );
    let _ = writeln!(
        out,
        "Signal: {} ({})  RSI({}): {}",
        snap.decision.signal,
        snap.decision.reason,
        params.rsi_period,
        fmt_opt(snap.rsi, 1)
    );
    let _ = writeln!(
        out,
        "SMA {}: {}  SMA {}: {}  policy: {}",
        params.sma_short,
        fmt_opt(snap.sma_short, 2),
        params.sma_long,
        fmt_opt(snap.sma_long, 2),
        policy.name()
    );
    out.push('\n');
    out.push_str(&format_frame_tail(&snap.frame, policy, max_points));
    out
}

pub fn format_frame_tail(frame: &IndicatorFrame, policy: &SignalPolicy, max_points: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<19} {:>12} {:>12} {:>12} {:>6}  {}",
        "TIMESTAMP", "CLOSE", "SMA SHORT", "SMA LONG", "RSI", "SIGNAL"
    );

    let signals = signal_history(frame, policy);
    let skip = frame.len().saturating_sub(max_points);
    for (row, decision) in frame.rows().zip(&signals).skip(skip) {
        let _ = writeln!(
            out,
            "{:<19} {:>12.2} {:>12} {:>12} {:>6}  {}",
            row.timestamp().format("%Y-%m-%d %H:%M:%S").to_string(),
            row.close(),
            fmt_opt(row.sma_short, 2),
            fmt_opt(row.sma_long, 2),
            fmt_opt(row.rsi, 1),
            decision.signal
        );
    }
    out
}

//! Integration tests for the scan pipeline.
//!
//! Tests cover:
//! - Indicator engine scenarios on hand-checked price series
//! - Signal classification across whole series
//! - Universe evaluation with per-symbol failures isolated
//! - End-to-end scan over CSV files on disk

mod common;

use approx::assert_relative_eq;
use common::*;
use tickerscope::adapters::csv_market_data::CsvMarketData;
use tickerscope::domain::dashboard::{SymbolOutcome, evaluate_symbol, evaluate_universe};
use tickerscope::domain::error::DataError;
use tickerscope::domain::frame::{IndicatorFrame, IndicatorParams};
use tickerscope::domain::history::HistoryRequest;
use tickerscope::domain::indicator::rsi::{ZeroLossPolicy, calculate_rsi};
use tickerscope::domain::indicator::sma::calculate_sma;
use tickerscope::domain::signal::{
    Signal, SignalPolicy, SignalReason, classify_signal, signal_history,
};

mod indicator_scenarios {
    use super::*;

    #[test]
    fn rising_prices_short_sma_leads_long() {
        let series = make_series("UP", &linear(11, 10.0, 1.0));
        let short = calculate_sma(&series, 3);
        let long = calculate_sma(&series, 5);

        assert!((0..2).all(|i| short.get(i).is_none()));
        assert!((0..4).all(|i| long.get(i).is_none()));

        for i in 3..11 {
            assert!(short.get(i).unwrap() > short.get(i - 1).unwrap());
        }
        for i in 5..11 {
            assert!(long.get(i).unwrap() > long.get(i - 1).unwrap());
        }
        for i in 4..11 {
            assert!(short.get(i).unwrap() > long.get(i).unwrap());
        }
        assert_relative_eq!(short.get(10).unwrap(), 19.0);
        assert_relative_eq!(long.get(10).unwrap(), 18.0);
    }

    #[test]
    fn flat_prices_have_no_rsi_and_no_trades() {
        let series = make_series("FLAT", &[50.0; 30]);
        for policy in [ZeroLossPolicy::Clamp, ZeroLossPolicy::Undefined] {
            assert_eq!(calculate_rsi(&series, 14, policy).defined_count(), 0);
        }

        let frame = IndicatorFrame::compute(&series, &small_params());
        for policy in [SignalPolicy::crossover(), SignalPolicy::trend_momentum()] {
            assert!(
                signal_history(&frame, &policy)
                    .iter()
                    .all(|d| d.signal == Signal::Hold)
            );
        }
    }

    #[test]
    fn three_points_with_period_fourteen() {
        let series = make_series("SHORT", &[10.0, 11.0, 12.0]);
        let params = IndicatorParams {
            sma_short: 2,
            sma_long: 3,
            rsi_period: 14,
            zero_loss: ZeroLossPolicy::Clamp,
        };
        let frame = IndicatorFrame::compute(&series, &params);

        assert_eq!(frame.rsi().defined_count(), 0);
        let decision = classify_signal(&frame, &SignalPolicy::crossover());
        assert_eq!(decision.signal, Signal::Hold);
        assert_eq!(
            decision.reason,
            SignalReason::InsufficientData {
                bars: 3,
                minimum: 14
            }
        );
    }

    #[test]
    fn monotonic_rsi_extremes() {
        let up = make_series("UP", &linear(20, 100.0, 1.5));
        let clamped = calculate_rsi(&up, 14, ZeroLossPolicy::Clamp);
        assert!((14..20).all(|i| clamped.get(i) == Some(100.0)));
        assert_eq!(
            calculate_rsi(&up, 14, ZeroLossPolicy::Undefined).defined_count(),
            0
        );

        let down = make_series("DOWN", &linear(20, 100.0, -2.0));
        let rsi = calculate_rsi(&down, 14, ZeroLossPolicy::Clamp);
        assert!((14..20).all(|i| rsi.get(i) == Some(0.0)));
    }
}

mod signal_classification {
    use super::*;

    #[test]
    fn crossover_fires_once_per_crossing_event() {
        let frame = IndicatorFrame::compute(&make_series("V", &V_SHAPE), &small_params());
        let neutral = SignalPolicy::Crossover {
            oversold: -1.0,
            overbought: 101.0,
        };

        let buys: Vec<usize> = signal_history(&frame, &neutral)
            .iter()
            .enumerate()
            .filter(|(_, d)| d.reason == SignalReason::CrossAbove)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(buys, vec![6]);
    }

    #[test]
    fn crossing_down_sells_once() {
        let frame = IndicatorFrame::compute(&make_series("P", &PEAK), &small_params());
        let neutral = SignalPolicy::Crossover {
            oversold: -1.0,
            overbought: 101.0,
        };

        let history = signal_history(&frame, &neutral);
        let sells: Vec<usize> = (0..history.len())
            .filter(|&i| history[i].signal == Signal::Sell)
            .collect();
        assert_eq!(sells, vec![6]);
        assert_eq!(history[6].reason, SignalReason::CrossBelow);
    }

    #[test]
    fn warm_up_rows_are_insufficient() {
        let frame = IndicatorFrame::compute(&make_series("V", &V_SHAPE), &small_params());
        let history = signal_history(&frame, &SignalPolicy::crossover());

        assert!(history[..4].iter().all(|d| d.is_insufficient()));
        assert!(history[4..].iter().all(|d| !d.is_insufficient()));
    }
}

mod universe_evaluation {
    use super::*;

    fn port() -> MockMarketData {
        MockMarketData::new()
            .with_prices("AAPL", &V_SHAPE[..7])
            .with_prices("MSFT", &PEAK[..7])
            .with_error(
                "BTC-USD",
                DataError::RateLimited {
                    symbol: "BTC-USD".into(),
                },
            )
    }

    #[test]
    fn failures_do_not_abort_the_scan() {
        let symbols: Vec<String> = ["AAPL", "BTC-USD", "MSFT", "NOPE"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let report = evaluate_universe(
            &port(),
            &symbols,
            &HistoryRequest::default(),
            &small_params(),
            &SignalPolicy::crossover(),
        );

        let order: Vec<&str> = report.entries.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["AAPL", "BTC-USD", "MSFT", "NOPE"]);

        let aapl = report.get("AAPL").unwrap().snapshot().unwrap();
        assert_eq!(aapl.decision.signal, Signal::Buy);
        assert_eq!(aapl.decision.reason, SignalReason::CrossAbove);
        assert_relative_eq!(aapl.latest_price, 19.0);
        assert_relative_eq!(aapl.percent_change, 200.0 / 17.0, epsilon = 1e-9);

        let msft = report.get("MSFT").unwrap().snapshot().unwrap();
        assert_eq!(msft.decision.signal, Signal::Sell);
        assert_eq!(msft.decision.reason, SignalReason::CrossBelow);

        assert!(matches!(
            report.get("BTC-USD"),
            Some(SymbolOutcome::Unavailable(DataError::RateLimited { .. }))
        ));
        assert!(matches!(
            report.get("NOPE"),
            Some(SymbolOutcome::Unavailable(DataError::NoData { .. }))
        ));

        let counts = report.counts();
        assert_eq!(
            (counts.buy, counts.sell, counts.hold, counts.unavailable),
            (1, 1, 0, 2)
        );
    }

    #[test]
    fn snapshot_frame_is_aligned_with_prices() {
        let outcome = evaluate_symbol(
            &port(),
            "AAPL",
            &HistoryRequest::default(),
            &small_params(),
            &SignalPolicy::trend_momentum(),
        );
        let snapshot = outcome.snapshot().unwrap();

        assert_eq!(snapshot.frame.len(), 7);
        assert_eq!(
            snapshot.frame.rows().map(|r| r.timestamp()).collect::<Vec<_>>(),
            snapshot.frame.series().timestamps()
        );
        assert_eq!(snapshot.sma_short, snapshot.frame.sma_short().latest());
    }
}

mod csv_scan {
    use super::*;
    use std::fs;

    fn dated(closes: &[f64]) -> Vec<(String, f64)> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (format!("2024-03-{:02}", i + 1), c))
            .collect()
    }

    fn write(dir: &std::path::Path, name: &str, closes: &[f64]) {
        let rows = dated(closes);
        let refs: Vec<(&str, f64)> = rows.iter().map(|(d, c)| (d.as_str(), *c)).collect();
        fs::write(dir.join(name), csv_text(&refs)).unwrap();
    }

    #[test]
    fn scans_files_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "AAPL_1d.csv", &V_SHAPE[..7]);
        write(dir.path(), "MSFT.csv", &PEAK[..7]);
        fs::write(
            dir.path().join("BAD.csv"),
            "Date,Close\n2024-03-01,10\n2024-03-02,-4\n",
        )
        .unwrap();

        let port = CsvMarketData::new(dir.path().to_path_buf());
        let symbols: Vec<String> = ["AAPL", "MSFT", "BAD", "GONE"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = evaluate_universe(
            &port,
            &symbols,
            &HistoryRequest::default(),
            &small_params(),
            &SignalPolicy::crossover(),
        );

        assert_eq!(
            report.get("AAPL").unwrap().snapshot().unwrap().signal(),
            Signal::Buy
        );
        assert_eq!(
            report.get("MSFT").unwrap().snapshot().unwrap().signal(),
            Signal::Sell
        );
        assert!(matches!(
            report.get("BAD"),
            Some(SymbolOutcome::Unavailable(DataError::Malformed { .. }))
        ));
        assert!(matches!(
            report.get("GONE"),
            Some(SymbolOutcome::Unavailable(DataError::NoData { .. }))
        ));
    }
}

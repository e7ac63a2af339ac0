//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_export::export_frame_to_path;
use crate::adapters::csv_market_data::CsvMarketData;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::table::{format_dashboard, format_detail};
use crate::domain::config_validation::validate_all;
use crate::domain::dashboard::{SymbolOutcome, evaluate_symbol, evaluate_universe};
use crate::domain::error::TickerscopeError;
use crate::domain::frame::{
    DEFAULT_RSI_PERIOD, DEFAULT_SMA_LONG, DEFAULT_SMA_SHORT, IndicatorParams,
};
use crate::domain::history::{HistoryPeriod, HistoryRequest, SampleInterval};
use crate::domain::indicator::rsi::ZeroLossPolicy;
use crate::domain::signal::{
    DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_TREND_BUY_RSI_BELOW,
    DEFAULT_TREND_SELL_RSI_ABOVE, SignalPolicy,
};
use crate::domain::universe::{default_symbols, parse_symbols};
use crate::logging::init_logging;
use crate::ports::config_port::ConfigPort;
use crate::scheduler::RefreshScheduler;

pub const DEFAULT_SOURCE_DIR: &str = "./data";
pub const DEFAULT_REFRESH_SECONDS: i64 = 30;
pub const DEFAULT_MAX_POINTS: i64 = 500;

#[derive(Parser, Debug)]
#[command(name = "tickerscope", about = "Technical signal dashboard for stocks and crypto")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan every configured symbol once and print the dashboard
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma separated symbols, overriding the config file
        #[arg(long)]
        symbols: Option<String>,
        /// Signal policy: crossover or trend
        #[arg(long)]
        policy: Option<String>,
    },
    /// Show one symbol with its recent indicator history
    Detail {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        /// Write the full indicator frame as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        max_points: Option<usize>,
    },
    /// Rescan on the configured refresh cadence until interrupted
    Watch {
        #[arg(short, long)]
        config: PathBuf,
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<usize>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything a scan needs, resolved from the config file and CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub symbols: Vec<String>,
    pub request: HistoryRequest,
    pub params: IndicatorParams,
    pub policy: SignalPolicy,
    pub data_dir: PathBuf,
    pub refresh_seconds: u64,
    pub max_points: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    match execute(cli.command) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Runs one command and returns its exit status.
pub fn execute(command: Command) -> Result<u8, TickerscopeError> {
    match command {
        Command::Scan {
            config,
            symbols,
            policy,
        } => run_scan(&config, symbols.as_deref(), policy.as_deref()),
        Command::Detail {
            config,
            symbol,
            output,
            max_points,
        } => run_detail(&config, &symbol, output.as_deref(), max_points),
        Command::Watch { config, ticks } => run_watch(&config, ticks),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TickerscopeError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn build_indicator_params(config: &dyn ConfigPort) -> Result<IndicatorParams, TickerscopeError> {
    let zero_loss = match config.get_non_empty("indicators", "rsi_zero_loss") {
        Some(raw) => raw
            .parse::<ZeroLossPolicy>()
            .map_err(|e| TickerscopeError::invalid("indicators", "rsi_zero_loss", e))?,
        None => ZeroLossPolicy::default(),
    };

    Ok(IndicatorParams {
        sma_short: window(config, "sma_short", DEFAULT_SMA_SHORT)?,
        sma_long: window(config, "sma_long", DEFAULT_SMA_LONG)?,
        rsi_period: window(config, "rsi_period", DEFAULT_RSI_PERIOD)?,
        zero_loss,
    })
}

fn window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, TickerscopeError> {
    let raw = config.get_int("indicators", key, default as i64);
    match usize::try_from(raw) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TickerscopeError::invalid(
            "indicators",
            key,
            format!("window must be positive, got {raw}"),
        )),
    }
}

/// Resolves the signal policy, letting `policy_override` replace the
/// configured name. Thresholds always come from the `[signal]` section.
pub fn build_signal_policy(
    config: &dyn ConfigPort,
    policy_override: Option<&str>,
) -> Result<SignalPolicy, TickerscopeError> {
    let name = policy_override
        .map(str::to_string)
        .or_else(|| config.get_non_empty("signal", "policy"));

    let policy = match name {
        Some(name) => name
            .parse::<SignalPolicy>()
            .map_err(|e| TickerscopeError::invalid("signal", "policy", e))?,
        None => SignalPolicy::default(),
    };

    Ok(match policy {
        SignalPolicy::Crossover { .. } => SignalPolicy::Crossover {
            oversold: config.get_double("signal", "oversold", DEFAULT_OVERSOLD),
            overbought: config.get_double("signal", "overbought", DEFAULT_OVERBOUGHT),
        },
        SignalPolicy::TrendMomentum { .. } => SignalPolicy::TrendMomentum {
            buy_rsi_below: config.get_double(
                "signal",
                "trend_buy_rsi_below",
                DEFAULT_TREND_BUY_RSI_BELOW,
            ),
            sell_rsi_above: config.get_double(
                "signal",
                "trend_sell_rsi_above",
                DEFAULT_TREND_SELL_RSI_ABOVE,
            ),
        },
    })
}

pub fn build_history_request(config: &dyn ConfigPort) -> Result<HistoryRequest, TickerscopeError> {
    let period = match config.get_non_empty("dashboard", "period") {
        Some(raw) => raw
            .parse::<HistoryPeriod>()
            .map_err(|e| TickerscopeError::invalid("dashboard", "period", e))?,
        None => HistoryPeriod::default(),
    };
    let interval = match config.get_non_empty("dashboard", "interval") {
        Some(raw) => raw
            .parse::<SampleInterval>()
            .map_err(|e| TickerscopeError::invalid("dashboard", "interval", e))?,
        None => SampleInterval::default(),
    };
    Ok(HistoryRequest { period, interval })
}

/// CLI override first, then `[dashboard] symbols`, then the default universe.
pub fn resolve_symbols(
    symbols_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, TickerscopeError> {
    let symbols = match symbols_override {
        Some(list) => parse_symbols(list),
        None => match config.get_non_empty("dashboard", "symbols") {
            Some(list) => parse_symbols(&list),
            None => default_symbols(),
        },
    };

    if symbols.is_empty() {
        return Err(TickerscopeError::invalid(
            "dashboard",
            "symbols",
            "no symbols to scan",
        ));
    }
    Ok(symbols)
}

pub fn data_dir(config: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(
        config
            .get_non_empty("data", "source_dir")
            .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string()),
    )
}

pub fn build_scan_settings(
    config: &dyn ConfigPort,
    symbols_override: Option<&str>,
    policy_override: Option<&str>,
) -> Result<ScanSettings, TickerscopeError> {
    let refresh = config.get_int("dashboard", "refresh_seconds", DEFAULT_REFRESH_SECONDS);
    let max_points = config.get_int("dashboard", "max_points", DEFAULT_MAX_POINTS);

    Ok(ScanSettings {
        symbols: resolve_symbols(symbols_override, config)?,
        request: build_history_request(config)?,
        params: build_indicator_params(config)?,
        policy: build_signal_policy(config, policy_override)?,
        data_dir: data_dir(config),
        refresh_seconds: u64::try_from(refresh).map_err(|_| {
            TickerscopeError::invalid("dashboard", "refresh_seconds", "must be at least 1")
        })?,
        max_points: usize::try_from(max_points).map_err(|_| {
            TickerscopeError::invalid("dashboard", "max_points", "must be at least 1")
        })?,
    })
}

fn load_settings(
    config_path: &Path,
    symbols_override: Option<&str>,
    policy_override: Option<&str>,
) -> Result<ScanSettings, TickerscopeError> {
    let adapter = load_config(config_path)?;
    validate_all(&adapter)?;
    build_scan_settings(&adapter, symbols_override, policy_override)
}

fn run_scan(
    config_path: &Path,
    symbols_override: Option<&str>,
    policy_override: Option<&str>,
) -> Result<u8, TickerscopeError> {
    let settings = load_settings(config_path, symbols_override, policy_override)?;
    let port = CsvMarketData::new(settings.data_dir.clone());

    eprintln!(
        "Scanning {} symbols ({} / {}, policy {})...",
        settings.symbols.len(),
        settings.request.period,
        settings.request.interval,
        settings.policy.name()
    );

    let report = evaluate_universe(
        &port,
        &settings.symbols,
        &settings.request,
        &settings.params,
        &settings.policy,
    );
    print!("{}", format_dashboard(&report));

    if report.counts().unavailable == report.len() {
        eprintln!("error: no symbol returned usable data");
        return Ok(5);
    }
    Ok(0)
}

fn run_detail(
    config_path: &Path,
    symbol: &str,
    output: Option<&Path>,
    max_points: Option<usize>,
) -> Result<u8, TickerscopeError> {
    let settings = load_settings(config_path, Some(symbol), None)?;
    let port = CsvMarketData::new(settings.data_dir.clone());
    let symbol = &settings.symbols[0];
    let max_points = max_points.unwrap_or(settings.max_points);

    match evaluate_symbol(
        &port,
        symbol,
        &settings.request,
        &settings.params,
        &settings.policy,
    ) {
        SymbolOutcome::Ready(snapshot) => {
            print!("{}", format_detail(&snapshot, &settings.policy, max_points));
            if let Some(path) = output {
                export_frame_to_path(&snapshot.frame, &settings.policy, path)?;
                eprintln!("\nFrame written to: {}", path.display());
            }
            Ok(0)
        }
        SymbolOutcome::Unavailable(e) => Err(e.into()),
    }
}

fn run_watch(config_path: &Path, ticks: Option<usize>) -> Result<u8, TickerscopeError> {
    let settings = load_settings(config_path, None, None)?;
    let port = CsvMarketData::new(settings.data_dir.clone());
    let scheduler =
        RefreshScheduler::new(settings.refresh_seconds)?.with_max_ticks(ticks.unwrap_or(0));

    eprintln!(
        "Watching {} symbols every {}s (Ctrl-C to stop)",
        settings.symbols.len(),
        settings.refresh_seconds
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let refreshes = runtime.block_on(scheduler.run(|tick| {
        let report = evaluate_universe(
            &port,
            &settings.symbols,
            &settings.request,
            &settings.params,
            &settings.policy,
        );
        println!(
            "-- refresh {} at {} --",
            tick,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        print!("{}", format_dashboard(&report));
    }));

    info!(refreshes, "watch finished");
    Ok(0)
}

fn run_validate(config_path: &Path) -> Result<u8, TickerscopeError> {
    let settings = load_settings(config_path, None, None)?;

    eprintln!("Config validated successfully");
    eprintln!("  symbols:    {}", settings.symbols.join(", "));
    eprintln!(
        "  history:    {} at {}",
        settings.request.period, settings.request.interval
    );
    eprintln!(
        "  indicators: SMA {} / SMA {}, RSI {} (zero loss: {})",
        settings.params.sma_short,
        settings.params.sma_long,
        settings.params.rsi_period,
        settings.params.zero_loss
    );
    eprintln!("  policy:     {}", settings.policy.name());
    eprintln!("  data dir:   {}", settings.data_dir.display());
    Ok(0)
}

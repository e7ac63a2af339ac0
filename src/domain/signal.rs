//! Buy / Sell / Hold classification of an [`IndicatorFrame`] row.
//!
//! Classification is a pure function of the evaluated row and, for the
//! crossover policy, the row before it. Nothing is carried between calls.

use crate::domain::frame::{FrameRow, IndicatorFrame};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_TREND_BUY_RSI_BELOW: f64 = 60.0;
pub const DEFAULT_TREND_SELL_RSI_ABOVE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalReason {
    InsufficientData { bars: usize, minimum: usize },
    CrossAbove,
    CrossBelow,
    Oversold,
    Overbought,
    TrendConfirmedUp,
    TrendConfirmedDown,
    NoTrigger,
}

impl fmt::Display for SignalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalReason::InsufficientData { bars, minimum } => {
                write!(f, "insufficient data ({} of {} bars)", bars, minimum)
            }
            SignalReason::CrossAbove => write!(f, "short SMA crossed above long SMA"),
            SignalReason::CrossBelow => write!(f, "short SMA crossed below long SMA"),
            SignalReason::Oversold => write!(f, "RSI oversold"),
            SignalReason::Overbought => write!(f, "RSI overbought"),
            SignalReason::TrendConfirmedUp => write!(f, "uptrend with RSI room"),
            SignalReason::TrendConfirmedDown => write!(f, "downtrend with RSI pressure"),
            SignalReason::NoTrigger => write!(f, "no trigger"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalDecision {
    pub signal: Signal,
    pub reason: SignalReason,
}

impl SignalDecision {
    fn new(signal: Signal, reason: SignalReason) -> Self {
        Self { signal, reason }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self.reason, SignalReason::InsufficientData { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalPolicy {
    /// Buy on a golden cross or oversold RSI; sell on a death cross or
    /// overbought RSI. Buy wins when both fire.
    Crossover { oversold: f64, overbought: f64 },
    /// Buy when the short SMA is above the long one and RSI is still below
    /// `buy_rsi_below`; sell on the mirror image with `sell_rsi_above`.
    TrendMomentum {
        buy_rsi_below: f64,
        sell_rsi_above: f64,
    },
}

impl SignalPolicy {
    pub fn crossover() -> Self {
        SignalPolicy::Crossover {
            oversold: DEFAULT_OVERSOLD,
            overbought: DEFAULT_OVERBOUGHT,
        }
    }

    pub fn trend_momentum() -> Self {
        SignalPolicy::TrendMomentum {
            buy_rsi_below: DEFAULT_TREND_BUY_RSI_BELOW,
            sell_rsi_above: DEFAULT_TREND_SELL_RSI_ABOVE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SignalPolicy::Crossover { .. } => "crossover",
            SignalPolicy::TrendMomentum { .. } => "trend",
        }
    }
}

impl Default for SignalPolicy {
    fn default() -> Self {
        SignalPolicy::crossover()
    }
}

/// Parses a policy name into that policy with its default thresholds.
impl FromStr for SignalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crossover" | "a" => Ok(SignalPolicy::crossover()),
            "trend" | "b" => Ok(SignalPolicy::trend_momentum()),
            other => Err(format!("unknown signal policy '{other}' (expected crossover or trend)")),
        }
    }
}

/// Classifies the latest row of `frame`.
pub fn classify_signal(frame: &IndicatorFrame, policy: &SignalPolicy) -> SignalDecision {
    match frame.len().checked_sub(1) {
        Some(last) => classify_at(frame, last, policy),
        None => SignalDecision::new(
            Signal::Hold,
            SignalReason::InsufficientData {
                bars: 0,
                minimum: frame.params().min_observations(),
            },
        ),
    }
}

/// Classifies row `index` as if it were the newest observation.
pub fn classify_at(frame: &IndicatorFrame, index: usize, policy: &SignalPolicy) -> SignalDecision {
    let minimum = frame.params().min_observations();
    let bars = (index + 1).min(frame.len());
    let current = match frame.row(index) {
        Some(row) if bars >= minimum => row,
        _ => {
            return SignalDecision::new(
                Signal::Hold,
                SignalReason::InsufficientData { bars, minimum },
            );
        }
    };

    match *policy {
        SignalPolicy::Crossover {
            oversold,
            overbought,
        } => {
            let previous = index.checked_sub(1).and_then(|i| frame.row(i));
            classify_crossover(&current, previous.as_ref(), oversold, overbought)
        }
        SignalPolicy::TrendMomentum {
            buy_rsi_below,
            sell_rsi_above,
        } => classify_trend(&current, buy_rsi_below, sell_rsi_above),
    }
}

/// Classifies every row; element `i` equals `classify_at(frame, i, policy)`.
pub fn signal_history(frame: &IndicatorFrame, policy: &SignalPolicy) -> Vec<SignalDecision> {
    (0..frame.len())
        .map(|i| classify_at(frame, i, policy))
        .collect()
}

fn classify_crossover(
    current: &FrameRow<'_>,
    previous: Option<&FrameRow<'_>>,
    oversold: f64,
    overbought: f64,
) -> SignalDecision {
    let now_above = current.short_above_long();
    let was_above = previous.and_then(FrameRow::short_above_long);
    let (crossed_above, crossed_below) = match (was_above, now_above) {
        (Some(was), Some(now)) => (!was && now, was && !now),
        _ => (false, false),
    };
    let rsi = current.rsi;

    if crossed_above {
        return SignalDecision::new(Signal::Buy, SignalReason::CrossAbove);
    }
    if rsi.is_some_and(|r| r < oversold) {
        return SignalDecision::new(Signal::Buy, SignalReason::Oversold);
    }
    if crossed_below {
        return SignalDecision::new(Signal::Sell, SignalReason::CrossBelow);
    }
    if rsi.is_some_and(|r| r > overbought) {
        return SignalDecision::new(Signal::Sell, SignalReason::Overbought);
    }
    SignalDecision::new(Signal::Hold, SignalReason::NoTrigger)
}

fn classify_trend(current: &FrameRow<'_>, buy_rsi_below: f64, sell_rsi_above: f64) -> SignalDecision {
    let (Some(short), Some(long), Some(rsi)) = (current.sma_short, current.sma_long, current.rsi)
    else {
        return SignalDecision::new(Signal::Hold, SignalReason::NoTrigger);
    };

    if short > long && rsi < buy_rsi_below {
        SignalDecision::new(Signal::Buy, SignalReason::TrendConfirmedUp)
    } else if short < long && rsi > sell_rsi_above {
        SignalDecision::new(Signal::Sell, SignalReason::TrendConfirmedDown)
    } else {
        SignalDecision::new(Signal::Hold, SignalReason::NoTrigger)
    }
}

//! Technical indicator implementations.
//!
//! Every indicator returns one value per input bar. Bars inside an
//! indicator's warm-up window carry `f64::NAN`, so any comparison made
//! against them is false and downstream conditions read as "not satisfied".
//!
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a per-bar series of indicator values
//! - `IndicatorRow`: every derived value for a single bar

pub mod atr;
pub mod ema;
pub mod engulfing;
pub mod rsi;

use std::fmt;

use crate::domain::filters::BarFilter;
use crate::domain::ohlcv::{self, PriceBar};

pub use atr::calculate_atr;
pub use ema::calculate_ema;
pub use engulfing::find_engulfing;
pub use rsi::calculate_rsi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Atr(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub(crate) fn warmup(indicator_type: IndicatorType, len: usize) -> Self {
        IndicatorSeries {
            indicator_type,
            values: vec![f64::NAN; len],
        }
    }

    /// Value at `index`, or `None` while the indicator is still warming up.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().filter(|v| !v.is_nan())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
        }
    }
}

/// Indicator periods used to build [`IndicatorRow`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            ema_fast: 5,
            ema_slow: 10,
            rsi_period: 14,
            atr_period: 14,
        }
    }
}

/// All derived values for one bar. Recomputed on every pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub atr: f64,
    pub engulfing: bool,
    pub bias_ok: bool,
    pub spread_ok: bool,
}

/// Compute one [`IndicatorRow`] per bar.
///
/// The bias and spread hooks are invoked here rather than inlined so that a
/// caller can swap either without touching the signal rules.
pub fn compute_indicator_rows(
    bars: &[PriceBar],
    params: &IndicatorParams,
    bias: &dyn BarFilter,
    spread: &dyn BarFilter,
) -> Vec<IndicatorRow> {
    let closes = ohlcv::closes(bars);
    let ema_fast = calculate_ema(&closes, params.ema_fast);
    let ema_slow = calculate_ema(&closes, params.ema_slow);
    let rsi = calculate_rsi(&closes, params.rsi_period);
    let atr = calculate_atr(bars, params.atr_period);
    let engulfing = find_engulfing(bars);
    let bias_ok = bias.apply(bars);
    let spread_ok = spread.apply(bars);

    (0..bars.len())
        .map(|i| IndicatorRow {
            ema_fast: ema_fast.values[i],
            ema_slow: ema_slow.values[i],
            rsi: rsi.values[i],
            atr: atr.values[i],
            engulfing: engulfing[i],
            // a hook that returns a short mask blocks the uncovered bars
            bias_ok: bias_ok.get(i).copied().unwrap_or(false),
            spread_ok: spread_ok.get(i).copied().unwrap_or(false),
        })
        .collect()
}

//! Per-bar directional signals composed from indicator rows.

use std::fmt;

use crate::domain::filters::{BarFilter, h4_bias, spread_filter};
use crate::domain::indicator::{IndicatorParams, IndicatorRow, compute_indicator_rows};
use crate::domain::ohlcv::PriceBar;

/// Number of columns in a feature row: ema_fast, ema_slow, rsi, engulfing.
pub const FEATURE_COUNT: usize = 4;

pub type FeatureRow = [f64; FEATURE_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Signal {
    Short,
    #[default]
    Flat,
    Long,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Short => -1,
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }

    /// Sign of `value`: positive is long, negative short, zero flat.
    pub fn from_i8(value: i8) -> Self {
        match value.signum() {
            1 => Signal::Long,
            -1 => Signal::Short,
            _ => Signal::Flat,
        }
    }

    /// +1.0 / -1.0 for entries, 0.0 when flat.
    pub fn direction(self) -> f64 {
        self.as_i8() as f64
    }

    pub fn is_entry(self) -> bool {
        self != Signal::Flat
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParams {
    pub indicators: IndicatorParams,
    /// Longs require RSI below this.
    pub rsi_hi: f64,
    /// Shorts require RSI above this.
    pub rsi_lo: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        SignalParams {
            indicators: IndicatorParams::default(),
            rsi_hi: 70.0,
            rsi_lo: 30.0,
        }
    }
}

/// Combines indicators and the bias/spread hooks into per-bar signals.
pub struct SignalComposer {
    bias: Box<dyn BarFilter>,
    spread: Box<dyn BarFilter>,
}

impl Default for SignalComposer {
    fn default() -> Self {
        SignalComposer {
            bias: Box::new(h4_bias()),
            spread: Box::new(spread_filter()),
        }
    }
}

impl SignalComposer {
    pub fn with_bias(mut self, bias: impl BarFilter + 'static) -> Self {
        self.bias = Box::new(bias);
        self
    }

    pub fn with_spread(mut self, spread: impl BarFilter + 'static) -> Self {
        self.spread = Box::new(spread);
        self
    }

    pub fn indicator_rows(&self, bars: &[PriceBar], params: &SignalParams) -> Vec<IndicatorRow> {
        compute_indicator_rows(bars, &params.indicators, self.bias.as_ref(), self.spread.as_ref())
    }

    /// Indicator rows plus the raw signal for each bar.
    pub fn compose(
        &self,
        bars: &[PriceBar],
        params: &SignalParams,
    ) -> (Vec<IndicatorRow>, Vec<Signal>) {
        let rows = self.indicator_rows(bars, params);
        let signals = rows
            .iter()
            .map(|row| signal_for_row(row, params.rsi_hi, params.rsi_lo))
            .collect();
        (rows, signals)
    }
}

/// NaN indicator values fail every comparison, so warm-up bars stay flat.
pub fn signal_for_row(row: &IndicatorRow, rsi_hi: f64, rsi_lo: f64) -> Signal {
    let gates = row.engulfing && row.bias_ok && row.spread_ok;
    if !gates {
        return Signal::Flat;
    }
    if row.ema_fast > row.ema_slow && row.rsi < rsi_hi {
        Signal::Long
    } else if row.ema_fast < row.ema_slow && row.rsi > rsi_lo {
        Signal::Short
    } else {
        Signal::Flat
    }
}

/// Learned-filter features with NaN replaced by zero.
pub fn feature_matrix(rows: &[IndicatorRow]) -> Vec<FeatureRow> {
    let clean = |v: f64| if v.is_nan() { 0.0 } else { v };
    rows.iter()
        .map(|r| {
            [
                clean(r.ema_fast),
                clean(r.ema_slow),
                clean(r.rsi),
                if r.engulfing { 1.0 } else { 0.0 },
            ]
        })
        .collect()
}

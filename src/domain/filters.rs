//! Injectable filter hooks.
//!
//! `BarFilter` maps a price table to a per-bar pass mask. The higher-timeframe
//! bias and spread hooks are pass-through in this crate; a real implementation
//! replaces them without touching the signal rules. `SignalGuard` is the
//! equivalent hook between the learned filter and trade construction.

use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::Signal;

pub trait BarFilter {
    /// One flag per bar; `true` lets the bar's signal through.
    fn apply(&self, bars: &[PriceBar]) -> Vec<bool>;
}

impl<F> BarFilter for F
where
    F: Fn(&[PriceBar]) -> Vec<bool>,
{
    fn apply(&self, bars: &[PriceBar]) -> Vec<bool> {
        self(bars)
    }
}

/// Accepts every bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughFilter;

impl BarFilter for PassThroughFilter {
    fn apply(&self, bars: &[PriceBar]) -> Vec<bool> {
        vec![true; bars.len()]
    }
}

/// Higher-timeframe (H4) directional bias hook.
pub fn h4_bias() -> PassThroughFilter {
    PassThroughFilter
}

/// Spread / liquidity hook.
pub fn spread_filter() -> PassThroughFilter {
    PassThroughFilter
}

pub trait SignalGuard {
    fn guard(&self, signals: &[Signal]) -> Vec<Signal>;
}

/// Returns the signals unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughGuard;

impl SignalGuard for PassThroughGuard {
    fn guard(&self, signals: &[Signal]) -> Vec<Signal> {
        signals.to_vec()
    }
}

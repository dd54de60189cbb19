//! Trade-log statistics used by the reward.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::TradeRecord;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const SHARPE_EPSILON: f64 = 1e-8;

/// Statistics checked by the hard constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChallengeMetrics {
    pub trades: usize,
    pub trading_days: usize,
    pub start_equity: f64,
    pub net_profit_pct: f64,
    pub max_drawdown: f64,
    pub max_daily_drawdown: f64,
}

impl ChallengeMetrics {
    pub fn compute(trades: &[TradeRecord], default_start_equity: f64) -> Self {
        let start_equity = start_equity(trades, default_start_equity);
        let curve = equity_curve(trades, start_equity);
        ChallengeMetrics {
            trades: trades.len(),
            trading_days: trading_days(trades),
            start_equity,
            net_profit_pct: net_profit_pct(trades, start_equity),
            max_drawdown: max_drawdown(&curve),
            max_daily_drawdown: max_daily_drawdown(trades, &curve),
        }
    }
}

/// Statistics only computed once the hard constraints pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceMetrics {
    pub sharpe: f64,
    /// Percent of trades with positive PnL.
    pub win_rate: f64,
    /// Population standard deviation of raw PnL.
    pub volatility: f64,
}

impl PerformanceMetrics {
    pub fn compute(trades: &[TradeRecord], start_equity: f64) -> Self {
        let curve = equity_curve(trades, start_equity);
        let pnl: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
        PerformanceMetrics {
            sharpe: sharpe_ratio(&curve),
            win_rate: win_rate(&pnl),
            volatility: if pnl.len() < 2 { 0.0 } else { std_dev(&pnl) },
        }
    }
}

/// The first record's start equity applies to the whole log.
pub fn start_equity(trades: &[TradeRecord], default: f64) -> f64 {
    trades.first().and_then(|t| t.start_equity).unwrap_or(default)
}

/// start_equity + cumulative PnL, one point per trade.
pub fn equity_curve(trades: &[TradeRecord], start_equity: f64) -> Vec<f64> {
    trades
        .iter()
        .scan(start_equity, |equity, t| {
            *equity += t.pnl;
            Some(*equity)
        })
        .collect()
}

pub fn net_profit_pct(trades: &[TradeRecord], start_equity: f64) -> f64 {
    if start_equity <= 0.0 {
        return 0.0;
    }
    100.0 * trades.iter().map(|t| t.pnl).sum::<f64>() / start_equity
}

pub fn trading_days(trades: &[TradeRecord]) -> usize {
    trades.iter().map(|t| t.day()).collect::<BTreeSet<_>>().len()
}

/// Largest peak-to-trough decline as a fraction of the running peak.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &equity in curve {
        peak = peak.max(equity);
        max_dd = max_dd.max((peak - equity) / peak);
    }
    max_dd
}

/// Largest drawdown within a single UTC day; the peak restarts each day.
pub fn max_daily_drawdown(trades: &[TradeRecord], curve: &[f64]) -> f64 {
    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for (trade, &equity) in trades.iter().zip(curve) {
        by_day.entry(trade.day()).or_default().push(equity);
    }
    by_day
        .values()
        .map(|day| max_drawdown(day))
        .fold(0.0, f64::max)
}

/// Annualized mean/stddev of simple trade-to-trade equity returns.
pub fn sharpe_ratio(curve: &[f64]) -> f64 {
    if curve.len() < 2 {
        return 0.0;
    }
    let returns: Vec<f64> = curve.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    let sd = std_dev(&returns);
    if sd == 0.0 {
        return 0.0;
    }
    mean(&returns) / (sd + SHARPE_EPSILON) * TRADING_DAYS_PER_YEAR.sqrt()
}

pub fn win_rate(pnl: &[f64]) -> f64 {
    if pnl.is_empty() {
        return 0.0;
    }
    let wins = pnl.iter().filter(|&&p| p > 0.0).count();
    100.0 * wins as f64 / pnl.len() as f64
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

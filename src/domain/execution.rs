//! Trade proposal construction.
//!
//! Turns surviving entry signals into sized proposals with ATR stops and
//! targets, capped at `max_trades` and gated by the drawdown guard.

use chrono::{DateTime, Utc};

use super::indicator::IndicatorRow;
use super::ohlcv::PriceBar;
use super::risk::{DEFAULT_PIP_VALUE, daily_drawdown_guard, position_size};
use super::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct TradeProposal {
    pub time: DateTime<Utc>,
    /// Always `Long` or `Short`.
    pub signal: Signal,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Lots, at least 0.01.
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionParams {
    pub atr_sl_mult: f64,
    pub atr_tp_mult: f64,
    pub equity: f64,
    /// Percent of equity risked per trade.
    pub risk_per_trade: f64,
    pub max_trades: usize,
    pub start_equity: f64,
    /// Drawdown ceiling as a fraction of `start_equity`.
    pub max_dd: f64,
    pub pip_value: f64,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        ExecutionParams {
            atr_sl_mult: 2.0,
            atr_tp_mult: 3.0,
            equity: 10_000.0,
            risk_per_trade: 0.5,
            max_trades: 5,
            start_equity: 10_000.0,
            max_dd: 0.03,
            pip_value: DEFAULT_PIP_VALUE,
        }
    }
}

/// Build proposals in bar order.
///
/// `bars`, `rows` and `signals` are aligned by index. Flat signals and bars
/// without a usable ATR are skipped. A drawdown-guard breach ends the scan.
///
/// The guard's equity curve is seeded with `params.equity` and only ever
/// grows by that same value; realized PnL is not folded back in.
pub fn propose_trades(
    bars: &[PriceBar],
    rows: &[IndicatorRow],
    signals: &[Signal],
    params: &ExecutionParams,
) -> Vec<TradeProposal> {
    let mut proposals = Vec::new();
    let mut equity_curve = vec![params.equity];

    for ((bar, row), &signal) in bars.iter().zip(rows).zip(signals) {
        if !signal.is_entry() || proposals.len() >= params.max_trades {
            continue;
        }
        let atr = row.atr;
        if atr.is_nan() || atr == 0.0 {
            continue;
        }

        let direction = signal.direction();
        let price = bar.close;
        let stop_loss = price - direction * params.atr_sl_mult * atr;
        let take_profit = price + direction * params.atr_tp_mult * atr;
        let size = position_size(params.equity, params.risk_per_trade, atr, params.pip_value);

        if !daily_drawdown_guard(&equity_curve, params.start_equity, params.max_dd) {
            tracing::debug!(time = %bar.datetime, "drawdown guard breached, stopping entries");
            break;
        }

        proposals.push(TradeProposal {
            time: bar.datetime,
            signal,
            stop_loss,
            take_profit,
            size,
        });
        equity_curve.push(params.equity);
    }

    proposals
}

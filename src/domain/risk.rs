//! Position sizing and the drawdown guard.

/// USD per pip for one standard EURUSD lot.
pub const DEFAULT_PIP_VALUE: f64 = 10.0;

/// Price units per pip for four-decimal quotes.
const PIPS_PER_PRICE_UNIT: f64 = 10_000.0;

pub const MIN_LOTS: f64 = 0.01;

/// Lots risking `risk_pct` percent of `equity` with a stop `atr_value` away.
///
/// Rounded to two decimals and floored at 0.01 lots. Returns 0.0 only when
/// the stop distance is zero.
pub fn position_size(equity: f64, risk_pct: f64, atr_value: f64, pip_value: f64) -> f64 {
    let risk = equity * risk_pct / 100.0;
    let stop_pips = atr_value * PIPS_PER_PRICE_UNIT;
    if stop_pips == 0.0 {
        return 0.0;
    }
    let lots = risk / (stop_pips * pip_value);
    MIN_LOTS.max(round_lots(lots))
}

fn round_lots(lots: f64) -> f64 {
    (lots * 100.0).round_ties_even() / 100.0
}

/// Whether the drawdown of `equity_curve` from `start_equity` stays within
/// `max_dd` (a fraction, e.g. 0.03).
pub fn daily_drawdown_guard(equity_curve: &[f64], start_equity: f64, max_dd: f64) -> bool {
    let Some(min_equity) = equity_curve.iter().copied().reduce(f64::min) else {
        return true;
    };
    let dd = (start_equity - min_equity) / start_equity;
    dd <= max_dd
}

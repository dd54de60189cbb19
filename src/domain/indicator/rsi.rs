//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses simple rolling means over the last n price changes, not Wilder's
//! smoothing:
//! - avg_gain = mean(max(delta, 0)), avg_loss = mean(max(-delta, 0))
//! - RSI = 100 - 100 / (1 + avg_gain / (avg_loss + 1e-9))
//!
//! Warmup: first n bars are NaN (n price changes are needed).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

const LOSS_EPSILON: f64 = 1e-9;

pub fn calculate_rsi(series: &[f64], period: usize) -> IndicatorSeries {
    let mut out = IndicatorSeries::warmup(IndicatorType::Rsi(period), series.len());
    if period == 0 || series.len() <= period {
        return out;
    }

    let gains: Vec<f64> = series.windows(2).map(|w| (w[1] - w[0]).max(0.0)).collect();
    let losses: Vec<f64> = series.windows(2).map(|w| (w[0] - w[1]).max(0.0)).collect();

    // delta index j belongs to bar j + 1
    for i in period..series.len() {
        let window = i - period..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        let rs = avg_gain / (avg_loss + LOSS_EPSILON);
        out.values[i] = 100.0 - 100.0 / (1.0 + rs);
    }

    out
}

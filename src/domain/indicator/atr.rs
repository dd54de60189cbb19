//! Average True Range indicator.
//!
//! TR[0] = high - low (no previous close), TR[i] = true range vs close[i-1].
//! ATR(n)[i] = simple mean of TR over the last n bars.
//! Warmup: first (n-1) bars are NaN.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_atr(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut out = IndicatorSeries::warmup(IndicatorType::Atr(period), bars.len());
    if period == 0 || bars.len() < period {
        return out;
    }

    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                (bar.high - bar.low).abs()
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    for i in period - 1..bars.len() {
        let window = &tr[i + 1 - period..=i];
        out.values[i] = window.iter().sum::<f64>() / period as f64;
    }

    out
}

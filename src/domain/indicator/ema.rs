//! Exponential Moving Average indicator.
//!
//! k = 2/(span+1), EMA[0] = C[0], then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warm-up: the first output equals the first input exactly.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_ema(series: &[f64], span: usize) -> IndicatorSeries {
    if span == 0 {
        return IndicatorSeries::warmup(IndicatorType::Ema(span), series.len());
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut values = Vec::with_capacity(series.len());
    let mut prev: Option<f64> = None;

    for &value in series {
        let ema = match prev {
            None => value,
            Some(p) => value * k + p * (1.0 - k),
        };
        values.push(ema);
        prev = Some(ema);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

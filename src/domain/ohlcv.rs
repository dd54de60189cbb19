//! Price bar representation and table cleaning.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceBar {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = (self.high - self.low).abs();
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// Green candle: close strictly above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Red candle: close strictly below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Sort ascending by timestamp, keep the first bar of any duplicated
/// timestamp, and drop bars with non-finite prices.
pub fn clean_bars(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    let before = bars.len();
    bars.retain(PriceBar::is_finite);
    let non_finite = before - bars.len();

    // stable sort keeps the first occurrence ahead of later duplicates
    bars.sort_by_key(|b| b.datetime);
    let sorted = bars.len();
    bars.dedup_by_key(|b| b.datetime);
    let duplicates = sorted - bars.len();

    if non_finite > 0 || duplicates > 0 {
        tracing::warn!(non_finite, duplicates, kept = bars.len(), "dropped price bars");
    }
    bars
}

pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

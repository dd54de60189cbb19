//! Two-bar engulfing candlestick detector.
//!
//! Bullish: previous bar red, current bar green, current open below the
//! previous close and current close above the previous open.
//! Bearish: the mirror image. The first bar has no predecessor and is false.

use crate::domain::ohlcv::PriceBar;

pub fn find_engulfing(bars: &[PriceBar]) -> Vec<bool> {
    let mut out = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return out;
    }
    out.push(false);
    out.extend(bars.windows(2).map(|w| is_engulfing(&w[0], &w[1])));
    out
}

fn is_engulfing(prev: &PriceBar, cur: &PriceBar) -> bool {
    let bullish = prev.is_bearish()
        && cur.is_bullish()
        && cur.open < prev.close
        && cur.close > prev.open;
    let bearish = prev.is_bullish()
        && cur.is_bearish()
        && cur.open > prev.close
        && cur.close < prev.open;
    bullish || bearish
}

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
pub use scalptrader::domain::ohlcv::PriceBar;
pub use scalptrader::domain::reward::TradeRecord;
use scalptrader::domain::error::ScalperError;
use scalptrader::ports::data_port::DataPort;
use scalptrader::ports::trade_log_port::TradeLogPort;
use std::io::Write;

pub struct MockDataPort {
    pub bars: Vec<PriceBar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, ScalperError> {
        if let Some(reason) = &self.error {
            return Err(ScalperError::Data {
                source_name: self.source_name(),
                reason: reason.clone(),
            });
        }
        Ok(self.bars.clone())
    }

    fn source_name(&self) -> String {
        "mock".to_string()
    }
}

pub struct MockTradeLog {
    pub trades: Vec<TradeRecord>,
}

impl TradeLogPort for MockTradeLog {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ScalperError> {
        Ok(self.trades.clone())
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn make_bar(index: usize, open: f64, close: f64) -> PriceBar {
    PriceBar {
        datetime: start_time() + Duration::minutes(15 * index as i64),
        open,
        high: open.max(close) + 0.0001,
        low: open.min(close) - 0.0001,
        close,
        volume: 100,
    }
}

/// Alternating red/green candles on a rising drift: every green bar
/// engulfs its predecessor inside an uptrend.
pub fn rising_zigzag(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| {
            let base = 1.10 + i as f64 * 0.0002;
            if i % 2 == 0 {
                make_bar(i, base + 0.0003, base - 0.0003)
            } else {
                make_bar(i, base - 0.0006, base + 0.0006)
            }
        })
        .collect()
}

/// Mirror image of [`rising_zigzag`]: bearish engulfing bars in a downtrend.
pub fn falling_zigzag(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| {
            let base = 1.10 - i as f64 * 0.0002;
            if i % 2 == 0 {
                make_bar(i, base - 0.0003, base + 0.0003)
            } else {
                make_bar(i, base + 0.0006, base - 0.0006)
            }
        })
        .collect()
}

/// `pnl[i]` lands on day `i / per_day`, one hour apart within a day.
pub fn trade_log(pnl: &[f64], per_day: usize) -> Vec<TradeRecord> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    pnl.iter()
        .enumerate()
        .map(|(i, &p)| {
            let ts = start
                + Duration::days((i / per_day) as i64)
                + Duration::hours((i % per_day) as i64);
            TradeRecord::new(ts, p)
        })
        .collect()
}

/// Spreads `pnl` evenly over `days` consecutive UTC dates, in order.
pub fn trade_log_over_days(pnl: &[f64], days: usize) -> Vec<TradeRecord> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let n = pnl.len().max(1);
    pnl.iter()
        .enumerate()
        .map(|(i, &p)| {
            let ts = start + Duration::days((i * days / n) as i64) + Duration::minutes(i as i64);
            TradeRecord::new(ts, p)
        })
        .collect()
}

pub fn trades_csv(trades: &[TradeRecord]) -> String {
    let mut out = String::from("timestamp,pnl\n");
    for t in trades {
        out.push_str(&format!("{},{}\n", t.timestamp.to_rfc3339(), t.pnl));
    }
    out
}

pub fn bars_csv(bars: &[PriceBar]) -> String {
    let mut out = String::from("datetime,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.datetime.to_rfc3339(),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    out
}

pub fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

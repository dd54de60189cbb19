//! CSV file adapter for price bars and closed-trade logs.

use crate::domain::error::ScalperError;
use crate::domain::ohlcv::{PriceBar, clean_bars};
use crate::domain::reward::TradeRecord;
use crate::ports::data_port::DataPort;
use crate::ports::trade_log_port::TradeLogPort;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;

/// A single CSV file.
///
/// Read as a price table (`datetime,open,high,low,close,volume`) through
/// [`DataPort`] or as a trade log (`timestamp,pnl[,start_equity]`) through
/// [`TradeLogPort`]. Timestamps are RFC 3339.
pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_rows<T: DeserializeOwned>(&self) -> Result<Vec<T>, String> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| format!("failed to read {}: {}", self.path.display(), e))?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        rdr.deserialize()
            .enumerate()
            .map(|(i, row)| row.map_err(|e| format!("row {}: {}", i + 1, e)))
            .collect()
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, ScalperError> {
        let raw: Vec<PriceBar> = self.read_rows().map_err(|reason| ScalperError::Data {
            source_name: self.source_name(),
            reason,
        })?;
        let bars = clean_bars(raw);
        if bars.is_empty() {
            return Err(ScalperError::EmptyTable {
                source_name: self.source_name(),
            });
        }
        tracing::debug!(path = %self.path.display(), bars = bars.len(), "loaded price bars");
        Ok(bars)
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}

impl TradeLogPort for CsvAdapter {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ScalperError> {
        let trades: Vec<TradeRecord> =
            self.read_rows().map_err(|reason| ScalperError::TradeLog {
                source_name: self.source_name(),
                reason,
            })?;
        tracing::debug!(path = %self.path.display(), trades = trades.len(), "loaded trade log");
        Ok(trades)
    }
}

//! Closed-trade log port trait.

use crate::domain::error::ScalperError;
use crate::domain::reward::TradeRecord;

pub trait TradeLogPort {
    /// Records in log order.
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ScalperError>;
}

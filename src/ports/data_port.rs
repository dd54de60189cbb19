//! Price data port trait.

use crate::domain::error::ScalperError;
use crate::domain::ohlcv::PriceBar;

pub trait DataPort {
    /// Bars sorted ascending by time with unique timestamps.
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, ScalperError>;

    /// Human-readable origin, used in log and error messages.
    fn source_name(&self) -> String;
}

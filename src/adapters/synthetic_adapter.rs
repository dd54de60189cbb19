//! Seeded synthetic EURUSD-like bars, used when no price file is available.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::domain::error::ScalperError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;

const BASE_PRICE: f64 = 1.10;
const CLOSE_STEP: f64 = 0.001;
const OPEN_NOISE: f64 = 0.0001;
const WICK_NOISE: f64 = 0.0002;

/// Random-walk bars on a fixed cadence.
///
/// The same `seed` always yields the same bars.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticDataAdapter {
    pub seed: u64,
    pub count: usize,
    pub start: DateTime<Utc>,
    pub bar_minutes: i64,
}

impl Default for SyntheticDataAdapter {
    fn default() -> Self {
        Self {
            seed: 1,
            count: 100,
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
            bar_minutes: 15,
        }
    }
}

impl SyntheticDataAdapter {
    /// Generates `count` bars, stopping early at the first timestamp chrono
    /// cannot represent. See [`Self::timestamps_fit`].
    pub fn generate(&self) -> Vec<PriceBar> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut walk = 0.0;
        (0..self.count)
            .map_while(|i| {
                let datetime = self.bar_time(i)?;
                walk += normal(&mut rng);
                let close = BASE_PRICE + CLOSE_STEP * walk;
                let open = close + OPEN_NOISE * normal(&mut rng);
                let high = open.max(close) + (WICK_NOISE * normal(&mut rng)).abs();
                let low = open.min(close) - (WICK_NOISE * normal(&mut rng)).abs();
                Some(PriceBar {
                    datetime,
                    open,
                    high,
                    low,
                    close,
                    volume: rng.gen_range(100..500),
                })
            })
            .collect()
    }

    /// Whether every one of the `count` bar timestamps is representable.
    pub fn timestamps_fit(&self) -> bool {
        self.count == 0 || self.bar_time(self.count - 1).is_some()
    }

    fn bar_time(&self, index: usize) -> Option<DateTime<Utc>> {
        let minutes = self.bar_minutes.checked_mul(i64::try_from(index).ok()?)?;
        self.start.checked_add_signed(Duration::try_minutes(minutes)?)
    }
}

fn normal(rng: &mut ChaCha8Rng) -> f64 {
    rng.sample(StandardNormal)
}

impl DataPort for SyntheticDataAdapter {
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, ScalperError> {
        if self.count == 0 {
            return Err(ScalperError::EmptyTable {
                source_name: self.source_name(),
            });
        }
        if !self.timestamps_fit() {
            return Err(ScalperError::Data {
                source_name: self.source_name(),
                reason: format!(
                    "{} bars of {} minutes run past the supported time range",
                    self.count, self.bar_minutes
                ),
            });
        }
        Ok(self.generate())
    }

    fn source_name(&self) -> String {
        format!("synthetic(seed={})", self.seed)
    }
}

/// Bars from `primary`, or synthetic bars when it is absent, fails or is
/// empty.
pub fn load_bars_or_synthetic(
    primary: Option<&dyn DataPort>,
    synthetic: &SyntheticDataAdapter,
) -> Result<Vec<PriceBar>, ScalperError> {
    if let Some(port) = primary {
        match port.fetch_bars() {
            Ok(bars) if !bars.is_empty() => return Ok(bars),
            Ok(_) => tracing::warn!(
                source = %port.source_name(),
                "no price bars, using synthetic data"
            ),
            Err(e) => tracing::warn!(
                source = %port.source_name(),
                error = %e,
                "price data unavailable, using synthetic data"
            ),
        }
    }
    synthetic.fetch_bars()
}

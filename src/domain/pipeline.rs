//! Signal-to-trade pipeline.
//!
//! Price table -> indicators -> composed signals -> learned filter ->
//! signal guard -> sized trade proposals. Every run recomputes everything
//! from the bars it is given; nothing is carried between calls.

use super::classifier::{FilterConfig, learned_filter};
use super::execution::{ExecutionParams, TradeProposal, propose_trades};
use super::filters::{PassThroughGuard, SignalGuard};
use super::ohlcv::PriceBar;
use super::signal::{SignalComposer, SignalParams, feature_matrix};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrategyParams {
    pub signal: SignalParams,
    pub execution: ExecutionParams,
    pub filter: FilterConfig,
}

pub struct Pipeline {
    composer: SignalComposer,
    guard: Box<dyn SignalGuard>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline {
            composer: SignalComposer::default(),
            guard: Box::new(PassThroughGuard),
        }
    }
}

impl Pipeline {
    pub fn new(composer: SignalComposer) -> Self {
        Pipeline {
            composer,
            ..Pipeline::default()
        }
    }

    pub fn with_guard(mut self, guard: impl SignalGuard + 'static) -> Self {
        self.guard = Box::new(guard);
        self
    }

    /// `bars` must be sorted ascending with unique timestamps.
    pub fn run(&self, bars: &[PriceBar], params: &StrategyParams) -> Vec<TradeProposal> {
        let (rows, raw) = self.composer.compose(bars, &params.signal);
        let features = feature_matrix(&rows);
        let filtered = learned_filter(&raw, &features, &params.filter);
        let guarded = self.guard.guard(&filtered);
        let proposals = propose_trades(bars, &rows, &guarded, &params.execution);

        tracing::debug!(
            bars = bars.len(),
            raw_entries = raw.iter().filter(|s| s.is_entry()).count(),
            filtered_entries = guarded.iter().filter(|s| s.is_entry()).count(),
            proposals = proposals.len(),
            "pipeline run complete"
        );
        proposals
    }
}

/// Run the default pipeline (pass-through hooks) over `bars`.
pub fn generate_signals(bars: &[PriceBar], params: &StrategyParams) -> Vec<TradeProposal> {
    Pipeline::default().run(bars, params)
}

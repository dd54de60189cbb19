//! End-to-end tests for the signal-to-trade pipeline.
//!
//! Tests cover:
//! - Long and short proposals on engineered trends
//! - Stop/target geometry and sizing
//! - Learned filter prefix preservation
//! - Loading through the data port with synthetic fallback

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use scalptrader::adapters::synthetic_adapter::{SyntheticDataAdapter, load_bars_or_synthetic};
use scalptrader::domain::classifier::{FilterConfig, learned_filter};
use scalptrader::domain::execution::ExecutionParams;
use scalptrader::domain::filters::{PassThroughGuard, SignalGuard};
use scalptrader::domain::pipeline::{Pipeline, StrategyParams, generate_signals};
use scalptrader::domain::signal::{Signal, SignalComposer, SignalParams, feature_matrix};

fn unfiltered(max_trades: usize) -> StrategyParams {
    StrategyParams {
        execution: ExecutionParams {
            max_trades,
            ..ExecutionParams::default()
        },
        filter: FilterConfig {
            enabled: false,
            ..FilterConfig::default()
        },
        ..StrategyParams::default()
    }
}

mod trends {
    use super::*;

    #[test]
    fn rising_trend_goes_long() {
        let bars = rising_zigzag(60);
        let out = generate_signals(&bars, &unfiltered(100));

        // engulfing green bars from index 15 (first bar with RSI) onwards
        assert_eq!(out.len(), 23);
        assert_eq!(out[0].time, bars[15].datetime);
        for p in &out {
            assert_eq!(p.signal, Signal::Long);
        }
    }

    #[test]
    fn falling_trend_goes_short() {
        let bars = falling_zigzag(60);
        let out = generate_signals(&bars, &unfiltered(100));

        assert_eq!(out.len(), 23);
        for p in &out {
            assert_eq!(p.signal, Signal::Short);
        }
    }

    #[test]
    fn levels_straddle_entry_price() {
        let bars = rising_zigzag(40);
        let out = generate_signals(&bars, &unfiltered(5));
        assert_eq!(out.len(), 5);

        for p in &out {
            let bar = bars.iter().find(|b| b.datetime == p.time).unwrap();
            let stop = bar.close - p.stop_loss;
            let target = p.take_profit - bar.close;
            assert!(stop > 0.0);
            // 2x ATR stop, 3x ATR target
            assert_relative_eq!(target / stop, 1.5, epsilon = 1e-9);
            // 50 USD risk over an 11 pip ATR at 10 USD/pip
            assert_relative_eq!(p.size, 0.45);
        }
    }

    #[test]
    fn short_levels_are_mirrored() {
        let bars = falling_zigzag(40);
        for p in generate_signals(&bars, &unfiltered(5)) {
            let bar = bars.iter().find(|b| b.datetime == p.time).unwrap();
            assert!(p.stop_loss > bar.close);
            assert!(p.take_profit < bar.close);
        }
    }

    #[test]
    fn too_short_table_yields_nothing() {
        let bars = rising_zigzag(10);
        assert!(generate_signals(&bars, &unfiltered(5)).is_empty());
    }

    #[test]
    fn rsi_ceiling_blocks_longs() {
        let bars = rising_zigzag(60);
        let params = StrategyParams {
            signal: SignalParams {
                rsi_hi: 50.0,
                ..SignalParams::default()
            },
            ..unfiltered(100)
        };
        assert!(generate_signals(&bars, &params).is_empty());
    }
}

mod learned_filter_stage {
    use super::*;

    #[test]
    fn prefix_matches_raw_signals() {
        let bars = SyntheticDataAdapter {
            count: 300,
            ..SyntheticDataAdapter::default()
        }
        .generate();
        let (rows, raw) = SignalComposer::default().compose(&bars, &SignalParams::default());
        let features = feature_matrix(&rows);
        let config = FilterConfig::default();

        let filtered = learned_filter(&raw, &features, &config);
        assert_eq!(filtered.len(), raw.len());
        assert_eq!(&filtered[..config.train_size], &raw[..config.train_size]);
        assert_eq!(filtered, learned_filter(&raw, &features, &config));
    }

    #[test]
    fn disabled_filter_is_identity() {
        let bars = rising_zigzag(80);
        let (rows, raw) = SignalComposer::default().compose(&bars, &SignalParams::default());
        let config = FilterConfig {
            enabled: false,
            ..FilterConfig::default()
        };
        assert_eq!(learned_filter(&raw, &feature_matrix(&rows), &config), raw);
    }

    #[test]
    fn filtered_run_is_reproducible() {
        let bars = rising_zigzag(200);
        let params = StrategyParams::default();
        let first = generate_signals(&bars, &params);
        assert_eq!(first, generate_signals(&bars, &params));
        assert!(first.len() <= params.execution.max_trades);
    }

    #[test]
    fn proposals_in_prefix_survive_filtering() {
        let bars = rising_zigzag(120);
        let filtered = generate_signals(&bars, &StrategyParams::default());
        let raw = generate_signals(&bars, &unfiltered(5));
        // the first five raw entries all fall inside the 50-bar training prefix
        assert_eq!(filtered, raw);
    }
}

mod hooks {
    use super::*;

    struct ShortsOnly;

    impl SignalGuard for ShortsOnly {
        fn guard(&self, signals: &[Signal]) -> Vec<Signal> {
            signals
                .iter()
                .map(|&s| if s == Signal::Short { s } else { Signal::Flat })
                .collect()
        }
    }

    #[test]
    fn custom_guard_filters_direction() {
        let bars = rising_zigzag(60);
        let pipeline = Pipeline::default().with_guard(ShortsOnly);
        assert!(pipeline.run(&bars, &unfiltered(100)).is_empty());
    }

    #[test]
    fn pass_through_guard_is_default() {
        let bars = rising_zigzag(60);
        let explicit = Pipeline::default().with_guard(PassThroughGuard);
        assert_eq!(
            explicit.run(&bars, &unfiltered(100)),
            generate_signals(&bars, &unfiltered(100))
        );
    }

    #[test]
    fn blocking_bias_hook_silences_entries() {
        let bars = rising_zigzag(60);
        let composer = SignalComposer::default()
            .with_bias(|bars: &[PriceBar]| vec![false; bars.len()]);
        let pipeline = Pipeline::new(composer);
        assert!(pipeline.run(&bars, &unfiltered(100)).is_empty());
    }
}

mod loading {
    use super::*;

    #[test]
    fn pipeline_over_mock_port() {
        let port = MockDataPort::new(rising_zigzag(60));
        let bars = load_bars_or_synthetic(Some(&port), &SyntheticDataAdapter::default()).unwrap();
        assert_eq!(bars.len(), 60);
        assert_eq!(generate_signals(&bars, &unfiltered(3)).len(), 3);
    }

    #[test]
    fn failing_port_falls_back_to_synthetic() {
        let port = MockDataPort::failing("connection refused");
        let synthetic = SyntheticDataAdapter::default();
        let bars = load_bars_or_synthetic(Some(&port), &synthetic).unwrap();
        assert_eq!(bars, synthetic.generate());
    }

    #[test]
    fn empty_port_falls_back_to_synthetic() {
        let port = MockDataPort::new(Vec::new());
        let bars = load_bars_or_synthetic(Some(&port), &SyntheticDataAdapter::default()).unwrap();
        assert_eq!(bars.len(), 100);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn synthetic_runs_respect_limits(seed in 0u64..10_000, max_trades in 1usize..8) {
        let bars = SyntheticDataAdapter {
            seed,
            count: 150,
            ..SyntheticDataAdapter::default()
        }
        .generate();
        let params = StrategyParams {
            execution: ExecutionParams {
                max_trades,
                ..ExecutionParams::default()
            },
            ..StrategyParams::default()
        };
        let out = generate_signals(&bars, &params);

        prop_assert!(out.len() <= max_trades);
        for pair in out.windows(2) {
            prop_assert!(pair[0].time < pair[1].time);
        }
        for p in &out {
            prop_assert!(p.signal.is_entry());
            prop_assert!(p.size >= 0.01);
            let bar = bars.iter().find(|b| b.datetime == p.time);
            prop_assert!(bar.is_some());
        }
    }
}

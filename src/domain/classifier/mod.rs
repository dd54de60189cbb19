//! Learned signal filter.
//!
//! Splits the bar series at `train_size`: the prefix keeps its raw signals
//! and doubles as the labelled training set, the suffix is replaced by the
//! classifier's predictions. There is no shuffling and nothing from the
//! suffix is visible during training.
//!
//! The filter never fails. It degrades to the identity when disabled, when
//! the `classifier` feature is compiled out, when the input is not longer
//! than `train_size`, or when features and signals are misaligned. A
//! single-class training prefix yields flat predictions for the suffix.

#[cfg(feature = "classifier")]
pub mod decision_tree;
#[cfg(feature = "classifier")]
pub mod random_forest;

use std::collections::BTreeSet;

use crate::domain::signal::{FeatureRow, Signal};

pub trait SignalClassifier {
    fn fit(&mut self, features: &[FeatureRow], labels: &[Signal]);
    fn predict(&self, features: &[FeatureRow]) -> Vec<Signal>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    pub enabled: bool,
    pub train_size: usize,
    pub n_estimators: usize,
    pub random_state: u64,
    pub max_depth: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            enabled: true,
            train_size: 50,
            n_estimators: 10,
            random_state: 42,
            max_depth: 8,
        }
    }
}

/// Filter `signals` with the default seeded random forest.
pub fn learned_filter(
    signals: &[Signal],
    features: &[FeatureRow],
    config: &FilterConfig,
) -> Vec<Signal> {
    if !config.enabled {
        tracing::debug!("learned filter disabled, passing signals through");
        return signals.to_vec();
    }

    #[cfg(feature = "classifier")]
    {
        let mut forest = random_forest::RandomForest::new(random_forest::ForestConfig {
            n_estimators: config.n_estimators,
            max_depth: config.max_depth,
            seed: config.random_state,
        });
        filter_with(&mut forest, signals, features, config.train_size)
    }

    #[cfg(not(feature = "classifier"))]
    {
        let _ = features;
        tracing::debug!("classifier not compiled in, passing signals through");
        signals.to_vec()
    }
}

/// Train `classifier` on the prefix and predict the suffix.
pub fn filter_with(
    classifier: &mut dyn SignalClassifier,
    signals: &[Signal],
    features: &[FeatureRow],
    train_size: usize,
) -> Vec<Signal> {
    if features.len() != signals.len() {
        tracing::warn!(
            signals = signals.len(),
            features = features.len(),
            "feature rows misaligned with signals, passing signals through"
        );
        return signals.to_vec();
    }
    if signals.len() <= train_size {
        tracing::debug!(len = signals.len(), train_size, "too few bars to split");
        return signals.to_vec();
    }

    let (y_train, _) = signals.split_at(train_size);
    let (x_train, x_test) = features.split_at(train_size);

    let mut out = Vec::with_capacity(signals.len());
    out.extend_from_slice(y_train);

    let classes: BTreeSet<Signal> = y_train.iter().copied().collect();
    if classes.len() < 2 {
        tracing::debug!(?classes, "single-class training prefix, suffix stays flat");
        out.resize(signals.len(), Signal::Flat);
        return out;
    }

    classifier.fit(x_train, y_train);
    out.extend(classifier.predict(x_test));
    out
}

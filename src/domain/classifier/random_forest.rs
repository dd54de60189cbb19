//! Seeded random forest classifier.
//!
//! Each tree is grown on a bootstrap sample drawn from its own
//! `ChaCha8Rng` seeded with `seed + tree_index`, so a forest is fully
//! reproducible from its config. Prediction is a majority vote.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::SignalClassifier;
use super::decision_tree::{DecisionTree, TreeConfig, majority};
use crate::domain::signal::{FEATURE_COUNT, FeatureRow, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        ForestConfig {
            n_estimators: 10,
            max_depth: 8,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        RandomForest {
            config,
            trees: Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn predict_one(&self, row: &FeatureRow) -> Signal {
        if self.trees.is_empty() {
            return Signal::Flat;
        }
        let mut votes = [0usize; 3];
        for tree in &self.trees {
            votes[(tree.predict_one(row).as_i8() + 1) as usize] += 1;
        }
        majority(&votes)
    }
}

impl SignalClassifier for RandomForest {
    fn fit(&mut self, features: &[FeatureRow], labels: &[Signal]) {
        let n = labels.len().min(features.len());
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            max_features: Some((FEATURE_COUNT as f64).sqrt().ceil() as usize),
            ..TreeConfig::default()
        };

        self.trees = (0..self.config.n_estimators.max(1))
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(i as u64));
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut tree = DecisionTree::new(tree_config);
                tree.fit(features, labels, &sample, &mut rng);
                tree
            })
            .collect();

        tracing::debug!(trees = self.trees.len(), samples = n, "random forest fitted");
    }

    fn predict(&self, features: &[FeatureRow]) -> Vec<Signal> {
        features.iter().map(|row| self.predict_one(row)).collect()
    }
}

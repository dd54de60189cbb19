//! Gini classification tree over feature rows.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::signal::{FEATURE_COUNT, FeatureRow, Signal};

const CLASSES: [Signal; 3] = [Signal::Short, Signal::Flat, Signal::Long];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features sampled per split; `None` considers all of them.
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            max_depth: 8,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(Signal),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

fn class_index(signal: Signal) -> usize {
    match signal {
        Signal::Short => 0,
        Signal::Flat => 1,
        Signal::Long => 2,
    }
}

fn class_counts(labels: &[Signal], indices: &[usize]) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for &i in indices {
        counts[class_index(labels[i])] += 1;
    }
    counts
}

fn gini(counts: &[usize; 3]) -> f64 {
    let n: usize = counts.iter().sum();
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

/// Most frequent class; ties go to the smallest class.
pub(crate) fn majority(counts: &[usize; 3]) -> Signal {
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    CLASSES[best]
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        DecisionTree { config, root: None }
    }

    /// Fit on the rows named by `indices` (repeats allowed, as in a bootstrap sample).
    pub fn fit<R: Rng>(
        &mut self,
        features: &[FeatureRow],
        labels: &[Signal],
        indices: &[usize],
        rng: &mut R,
    ) {
        self.root = if indices.is_empty() {
            None
        } else {
            Some(self.build(features, labels, indices, 0, rng))
        };
    }

    pub fn predict_one(&self, row: &FeatureRow) -> Signal {
        let mut node = match &self.root {
            Some(n) => n,
            None => return Signal::Flat,
        };
        loop {
            match node {
                Node::Leaf(class) => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf(_) => 1,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        self.root.as_ref().map(walk).unwrap_or(0)
    }

    fn build<R: Rng>(
        &self,
        features: &[FeatureRow],
        labels: &[Signal],
        indices: &[usize],
        depth: usize,
        rng: &mut R,
    ) -> Node {
        let counts = class_counts(labels, indices);
        let impurity = gini(&counts);

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || impurity <= 0.0
        {
            return Node::Leaf(majority(&counts));
        }

        match self.best_split(features, labels, indices, impurity, rng) {
            Some(split) => Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(self.build(features, labels, &split.left, depth + 1, rng)),
                right: Box::new(self.build(features, labels, &split.right, depth + 1, rng)),
            },
            None => Node::Leaf(majority(&counts)),
        }
    }

    /// Sampled features are searched first; the search continues past
    /// `max_features` only until some valid split has been found.
    fn best_split<R: Rng>(
        &self,
        features: &[FeatureRow],
        labels: &[Signal],
        indices: &[usize],
        parent_impurity: f64,
        rng: &mut R,
    ) -> Option<BestSplit> {
        let max_features = self.config.max_features.unwrap_or(FEATURE_COUNT).max(1);
        let mut order: Vec<usize> = (0..FEATURE_COUNT).collect();
        order.shuffle(rng);

        let n = indices.len() as f64;
        let mut best_gain = 0.0;
        let mut best: Option<BestSplit> = None;

        for (visited, &feature) in order.iter().enumerate() {
            if visited >= max_features && best.is_some() {
                break;
            }

            let mut values: Vec<f64> = indices.iter().map(|&i| features[i][feature]).collect();
            values.sort_by(f64::total_cmp);
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;
                let (left, right): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| features[i][feature] <= threshold);

                if left.len() < self.config.min_samples_leaf
                    || right.len() < self.config.min_samples_leaf
                {
                    continue;
                }

                let weighted = (left.len() as f64 * gini(&class_counts(labels, &left))
                    + right.len() as f64 * gini(&class_counts(labels, &right)))
                    / n;
                let gain = parent_impurity - weighted;

                if gain > best_gain {
                    best_gain = gain;
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        left,
                        right,
                    });
                }
            }
        }

        best
    }
}

//! Isolation-forest anomaly detector
//!
//! Random axis-aligned cuts on small subsamples; points that isolate in few
//! cuts are anomalous. Scores follow the usual `-2^(-E[h(x)] / c(ψ))` form, so
//! they sit in [-1, 0) and lower means more anomalous.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::error::{DetectorError, DetectorResult};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Clone, Debug)]
pub struct IsolationConfig {
    pub n_trees: usize,
    pub max_samples: usize,
    /// Expected share of outliers in the training data; sets the decision offset
    pub contamination: f64,
    pub seed: u64,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

impl IsolationConfig {
    fn validate(&self) -> DetectorResult<()> {
        if self.n_trees == 0 || self.max_samples == 0 {
            return Err(DetectorError::InvalidConfig(
                "isolation forest needs trees and samples".to_string(),
            ));
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(DetectorError::InvalidConfig(format!(
                "contamination must be in (0, 0.5], got {}",
                self.contamination
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
enum INode {
    External {
        size: usize,
    },
    Internal {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Clone, Debug)]
struct IsolationTree {
    nodes: Vec<INode>,
}

impl IsolationTree {
    fn grow(
        x: ArrayView2<f64>,
        indices: &mut [usize],
        height_limit: usize,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_node(x, indices, 0, height_limit, rng);
        tree
    }

    fn grow_node(
        &mut self,
        x: ArrayView2<f64>,
        indices: &mut [usize],
        depth: usize,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> usize {
        let n = indices.len();
        if depth >= height_limit || n <= 1 {
            return self.push_external(n);
        }

        let feature = rng.gen_range(0..x.ncols());
        let (lo, hi) = indices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                let v = x[[i, feature]];
                (lo.min(v), hi.max(v))
            });
        if lo >= hi {
            return self.push_external(n);
        }

        let threshold = rng.gen_range(lo..hi);
        let mut mid = 0;
        for i in 0..n {
            if x[[indices[i], feature]] < threshold {
                indices.swap(i, mid);
                mid += 1;
            }
        }

        let slot = self.nodes.len();
        self.nodes.push(INode::External { size: n });
        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = self.grow_node(x, left_indices, depth + 1, height_limit, rng);
        let right = self.grow_node(x, right_indices, depth + 1, height_limit, rng);
        self.nodes[slot] = INode::Internal {
            feature,
            threshold,
            left,
            right,
        };
        slot
    }

    fn push_external(&mut self, size: usize) -> usize {
        self.nodes.push(INode::External { size });
        self.nodes.len() - 1
    }

    /// Depth at which `row` isolates, plus the expected remaining depth of
    /// an unsplit external node
    fn path_length(&self, row: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[idx] {
                INode::External { size } => return depth + average_path_length(*size),
                INode::Internal {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                    depth += 1.0;
                }
            }
        }
    }
}

/// c(n): mean path length of an unsuccessful BST search over n points
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Clone, Debug)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
    n_features: usize,
    offset: f64,
}

impl IsolationForest {
    pub fn fit(x: ArrayView2<f64>, config: &IsolationConfig) -> DetectorResult<Self> {
        config.validate()?;
        let n = x.nrows();
        if n == 0 || x.ncols() == 0 {
            return Err(DetectorError::EmptyTrainingSet);
        }

        let sample_size = config.max_samples.min(n);
        let height_limit = (sample_size as f64).log2().ceil().max(1.0) as usize;

        let trees = (0..config.n_trees)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
                let mut subsample = sample(&mut rng, n, sample_size).into_vec();
                IsolationTree::grow(x, &mut subsample, height_limit, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            n_features: x.ncols(),
            offset: 0.0,
        };

        // Offset = contamination quantile of the training scores
        let mut scores: Vec<f64> = x.rows().into_iter().map(|row| forest.score(row)).collect();
        scores.sort_by(|a, b| a.total_cmp(b));
        let rank = ((config.contamination * (n - 1) as f64).round() as usize).min(n - 1);
        forest.offset = scores[rank];

        Ok(forest)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Anomaly score in [-1, 0); lower is more anomalous
    pub fn score_samples(&self, row: ArrayView1<f64>) -> DetectorResult<f64> {
        if row.len() != self.n_features {
            return Err(DetectorError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        Ok(self.score(row))
    }

    pub fn is_anomaly(&self, row: ArrayView1<f64>) -> DetectorResult<bool> {
        Ok(self.is_anomalous_score(self.score_samples(row)?))
    }

    pub fn is_anomalous_score(&self, score: f64) -> bool {
        score < self.offset
    }

    fn score(&self, row: ArrayView1<f64>) -> f64 {
        let mean_path = self.trees.iter().map(|t| t.path_length(row)).sum::<f64>()
            / self.trees.len() as f64;
        let norm = average_path_length(self.sample_size).max(f64::EPSILON);
        -(2f64.powf(-mean_path / norm))
    }
}

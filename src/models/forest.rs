//! Random-forest classifier
//!
//! Bagged CART trees split on Gini impurity, each split drawing √n candidate
//! features. Class probabilities are the mean of the leaf class frequencies.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::error::{DetectorError, DetectorResult};

#[derive(Clone, Debug)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 16,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

impl ForestConfig {
    fn validate(&self) -> DetectorResult<()> {
        if self.n_trees == 0 {
            return Err(DetectorError::InvalidConfig(
                "forest needs at least one tree".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(DetectorError::InvalidConfig(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Flat node arena; the root is always index 0
#[derive(Clone, Debug)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn leaf_distribution(&self, row: ArrayView1<f64>) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

struct TreeBuilder<'a> {
    x: ArrayView2<'a, f64>,
    y: &'a [usize],
    n_classes: usize,
    max_features: usize,
    config: &'a ForestConfig,
    rng: StdRng,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn build(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let n = indices.len();
        let counts = self.class_counts(indices);
        let parent_gini = gini(&counts, n);

        if depth >= self.config.max_depth || n < self.config.min_samples_split || parent_gini <= 0.0
        {
            return self.push_leaf(&counts, n);
        }

        let Some((feature, threshold)) = self.best_split(indices, &counts, parent_gini) else {
            return self.push_leaf(&counts, n);
        };

        let mut mid = 0;
        for i in 0..n {
            if self.x[[indices[i], feature]] <= threshold {
                indices.swap(i, mid);
                mid += 1;
            }
        }
        if mid == 0 || mid == n {
            return self.push_leaf(&counts, n);
        }

        // Reserve the parent slot so children land after it
        let slot = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });
        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = self.build(left_indices, depth + 1);
        let right = self.build(right_indices, depth + 1);
        self.nodes[slot] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        slot
    }

    fn best_split(
        &mut self,
        indices: &[usize],
        total: &[usize],
        parent_gini: f64,
    ) -> Option<(usize, f64)> {
        let n = indices.len();
        let candidates = sample(&mut self.rng, self.x.ncols(), self.max_features);

        let mut best: Option<(usize, f64)> = None;
        let mut best_impurity = parent_gini;
        let mut pairs: Vec<(f64, usize)> = Vec::with_capacity(n);
        let mut left = vec![0usize; self.n_classes];

        for feature in candidates.iter() {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (self.x[[i, feature]], self.y[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            left.iter_mut().for_each(|c| *c = 0);

            for k in 0..n - 1 {
                left[pairs[k].1] += 1;
                let (lo, hi) = (pairs[k].0, pairs[k + 1].0);
                if lo >= hi {
                    continue;
                }

                let n_left = k + 1;
                let n_right = n - n_left;
                let impurity = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini_remainder(total, &left, n_right))
                    / n as f64;

                if impurity + 1e-12 < best_impurity {
                    best_impurity = impurity;
                    let mut threshold = (lo + hi) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some((feature, threshold));
                }
            }
        }

        best
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += 1;
        }
        counts
    }

    fn push_leaf(&mut self, counts: &[usize], n: usize) -> usize {
        let total = n.max(1) as f64;
        self.nodes.push(Node::Leaf {
            distribution: counts.iter().map(|&c| c as f64 / total).collect(),
        });
        self.nodes.len() - 1
    }
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// Gini of `total - left` without materialising the right-hand counts
fn gini_remainder(total: &[usize], left: &[usize], n_right: usize) -> f64 {
    if n_right == 0 {
        return 0.0;
    }
    let n = n_right as f64;
    1.0 - total
        .iter()
        .zip(left)
        .map(|(&t, &l)| {
            let p = (t - l) as f64 / n;
            p * p
        })
        .sum::<f64>()
}

#[derive(Clone, Debug)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
}

impl RandomForest {
    pub fn fit<'a>(
        x: ArrayView2<'a, f64>,
        y: &'a [usize],
        n_classes: usize,
        config: &'a ForestConfig,
    ) -> DetectorResult<Self> {
        config.validate()?;
        let n = x.nrows();
        if n == 0 || x.ncols() == 0 {
            return Err(DetectorError::EmptyTrainingSet);
        }
        if n != y.len() {
            return Err(DetectorError::LengthMismatch {
                rows: n,
                labels: y.len(),
            });
        }
        if let Some(&label) = y.iter().find(|&&l| l >= n_classes) {
            return Err(DetectorError::InvalidLabel { label, n_classes });
        }

        let max_features = ((x.ncols() as f64).sqrt() as usize).max(1);

        let trees = (0..config.n_trees)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
                let mut bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut builder = TreeBuilder {
                    x,
                    y,
                    n_classes,
                    max_features,
                    config,
                    rng,
                    nodes: Vec::new(),
                };
                builder.build(&mut bootstrap, 0);
                DecisionTree {
                    nodes: builder.nodes,
                }
            })
            .collect();

        Ok(Self {
            trees,
            n_classes,
            n_features: x.ncols(),
        })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Mean class distribution over all trees; sums to 1
    pub fn predict_proba(&self, row: ArrayView1<f64>) -> DetectorResult<Vec<f64>> {
        if row.len() != self.n_features {
            return Err(DetectorError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_distribution(row)) {
                *acc += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    /// Most probable class; ties go to the lower index
    pub fn predict(&self, row: ArrayView1<f64>) -> DetectorResult<usize> {
        let proba = self.predict_proba(row)?;
        let mut best = 0;
        for (class, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = class;
            }
        }
        Ok(best)
    }
}

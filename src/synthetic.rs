//! Synthetic training data
//!
//! Two balanced populations: calm driving around gravity-only acceleration, and
//! collisions with large signed impulses on every accelerometer and gyroscope axis.

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::error::{DetectorError, DetectorResult};
use crate::types::{DEFAULT_ACCEL_Z, FEATURE_DIM};

pub const LABEL_NORMAL: usize = 0;
pub const LABEL_ACCIDENT: usize = 1;

pub const DEFAULT_SAMPLES: usize = 10_000;
pub const DEFAULT_SEED: u64 = 42;

/// Labelled feature matrix, one row per sample
#[derive(Clone, Debug)]
pub struct TrainingSet {
    pub features: Array2<f64>,
    pub labels: Vec<usize>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Row indices carrying `label`
    pub fn indices_of(&self, label: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// Copy of the rows labelled `label`, taken from `matrix` (raw or scaled)
    pub fn rows_of(&self, matrix: &Array2<f64>, label: usize) -> Array2<f64> {
        matrix.select(Axis(0), &self.indices_of(label))
    }
}

/// Generate `n_samples` rows, half normal then half accident.
/// Odd counts are rounded down to keep the classes balanced.
pub fn generate(n_samples: usize, seed: u64) -> DetectorResult<TrainingSet> {
    let per_class = n_samples / 2;
    if per_class == 0 {
        return Err(DetectorError::EmptyTrainingSet);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(per_class * 2 * FEATURE_DIM);
    let mut labels = Vec::with_capacity(per_class * 2);

    for _ in 0..per_class {
        data.extend_from_slice(&normal_row(&mut rng));
        labels.push(LABEL_NORMAL);
    }
    for _ in 0..per_class {
        data.extend_from_slice(&accident_row(&mut rng));
        labels.push(LABEL_ACCIDENT);
    }

    let features = Array2::from_shape_vec((labels.len(), FEATURE_DIM), data)?;
    Ok(TrainingSet { features, labels })
}

fn normal_row(rng: &mut StdRng) -> [f64; FEATURE_DIM] {
    [
        gaussian(rng, 0.0, 0.5),
        gaussian(rng, 0.0, 0.5),
        gaussian(rng, DEFAULT_ACCEL_Z, 0.5),
        gaussian(rng, 0.0, 0.2),
        gaussian(rng, 0.0, 0.2),
        gaussian(rng, 0.0, 0.2),
        rng.gen_range(0.0..80.0),
        gaussian(rng, 75.0, 10.0),
        gaussian(rng, 98.0, 2.0),
    ]
}

fn accident_row(rng: &mut StdRng) -> [f64; FEATURE_DIM] {
    // Impact: large signed impulse on each axis on top of wide noise
    let accel_x = gaussian(rng, 0.0, 3.0) + signed(rng, 15.0);
    let accel_y = gaussian(rng, 0.0, 3.0) + signed(rng, 15.0);
    let accel_z = gaussian(rng, DEFAULT_ACCEL_Z, 3.0) + signed(rng, 10.0);

    let gyro_x = gaussian(rng, 0.0, 2.0) + signed(rng, 5.0);
    let gyro_y = gaussian(rng, 0.0, 2.0) + signed(rng, 5.0);
    let gyro_z = gaussian(rng, 0.0, 2.0) + signed(rng, 5.0);

    [
        accel_x,
        accel_y,
        accel_z,
        gyro_x,
        gyro_y,
        gyro_z,
        rng.gen_range(20.0..120.0),
        gaussian(rng, 110.0, 20.0),
        gaussian(rng, 94.0, 4.0),
    ]
}

/// Box-Muller draw from N(mean, std_dev²)
fn gaussian(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    // u1 must stay off zero for ln()
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn signed(rng: &mut StdRng, magnitude: f64) -> f64 {
    if rng.gen::<bool>() {
        magnitude
    } else {
        -magnitude
    }
}

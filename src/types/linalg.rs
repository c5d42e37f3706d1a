//! Fixed-size vector types for sensor axes and model features
//!
//! Keeps the feature dimension checked at compile time so the extractor,
//! the rule-based labeller and the models always agree on column count.

use nalgebra::{SVector, Vector3};

// ===== Feature Dimensions =====
pub const FEATURE_DIM: usize = 9;

// Column positions inside a feature vector
pub const IDX_ACCEL_X: usize = 0;
pub const IDX_ACCEL_Y: usize = 1;
pub const IDX_ACCEL_Z: usize = 2;
pub const IDX_GYRO_X: usize = 3;
pub const IDX_GYRO_Y: usize = 4;
pub const IDX_GYRO_Z: usize = 5;
pub const IDX_SPEED: usize = 6;
pub const IDX_HEART_RATE: usize = 7;
pub const IDX_OXYGEN_LEVEL: usize = 8;

/// One 3-axis sensor sample (accelerometer m/s², gyroscope rad/s)
pub type Axis3 = Vector3<f64>;

/// Model input row, ordered as `features::FEATURE_NAMES`
pub type FeatureVector = SVector<f64, FEATURE_DIM>;

//! Feature extraction for the accident and risk models
//! Maps a sensor reading onto the fixed 9-column layout the models were trained on,
//! and provides the vector magnitudes the threshold rules are written against.

use crate::types::{
    Axis3, FeatureVector, SensorReading, FEATURE_DIM, IDX_ACCEL_X, IDX_ACCEL_Y, IDX_ACCEL_Z,
    IDX_GYRO_X, IDX_GYRO_Y, IDX_GYRO_Z,
};

pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "accel_x",
    "accel_y",
    "accel_z",
    "gyro_x",
    "gyro_y",
    "gyro_z",
    "speed",
    "heart_rate",
    "oxygen_level",
];

/// Build the model input row for a reading, with resting defaults applied
pub fn extract(reading: &SensorReading) -> FeatureVector {
    let accel = reading.accel();
    let gyro = reading.gyro();

    FeatureVector::from([
        accel.x,
        accel.y,
        accel.z,
        gyro.x,
        gyro.y,
        gyro.z,
        reading.speed_kmh(),
        reading.heart_rate_bpm(),
        reading.oxygen_level_pct(),
    ])
}

/// Euclidean norm over all three axes
pub fn magnitude(v: &Axis3) -> f64 {
    v.norm()
}

/// Norm of the horizontal (x, y) components only; ignores the gravity axis
pub fn planar_magnitude(v: &Axis3) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}

pub fn accel_of(features: &FeatureVector) -> Axis3 {
    Axis3::new(
        features[IDX_ACCEL_X],
        features[IDX_ACCEL_Y],
        features[IDX_ACCEL_Z],
    )
}

pub fn gyro_of(features: &FeatureVector) -> Axis3 {
    Axis3::new(
        features[IDX_GYRO_X],
        features[IDX_GYRO_Y],
        features[IDX_GYRO_Z],
    )
}

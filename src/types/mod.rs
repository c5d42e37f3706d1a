pub mod linalg;

pub use linalg::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resting accelerometer z-axis when the field is absent (gravity, device flat)
pub const DEFAULT_ACCEL_Z: f64 = -9.8;
pub const DEFAULT_SPEED_KMH: f64 = 0.0;
pub const DEFAULT_HEART_RATE_BPM: f64 = 75.0;
pub const DEFAULT_OXYGEN_LEVEL_PCT: f64 = 98.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl AccelData {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    pub fn vector(&self) -> Axis3 {
        Axis3::new(
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(DEFAULT_ACCEL_Z),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GyroData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl GyroData {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    pub fn vector(&self) -> Axis3 {
        Axis3::new(
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
        )
    }
}

/// A single motion + vital-sign reading as posted by the client.
///
/// Every field may be missing; accessors fill in the resting defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerometer: Option<AccelData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gyroscope: Option<GyroData>,
    /// Kept as the client's number so alerts echo it as sent (`95` vs `95.0`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_level: Option<f64>,
}

impl SensorReading {
    pub fn with_accel(mut self, x: f64, y: f64, z: f64) -> Self {
        self.accelerometer = Some(AccelData::new(x, y, z));
        self
    }

    pub fn with_gyro(mut self, x: f64, y: f64, z: f64) -> Self {
        self.gyroscope = Some(GyroData::new(x, y, z));
        self
    }

    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed = serde_json::Number::from_f64(speed_kmh);
        self
    }

    pub fn with_vitals(mut self, heart_rate: f64, oxygen_level: f64) -> Self {
        self.heart_rate = Some(heart_rate);
        self.oxygen_level = Some(oxygen_level);
        self
    }

    pub fn accel(&self) -> Axis3 {
        self.accelerometer.clone().unwrap_or_default().vector()
    }

    pub fn gyro(&self) -> Axis3 {
        self.gyroscope.clone().unwrap_or_default().vector()
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed
            .as_ref()
            .and_then(serde_json::Number::as_f64)
            .unwrap_or(DEFAULT_SPEED_KMH)
    }

    /// Speed formatted the way the client wrote it
    pub fn speed_label(&self) -> String {
        match &self.speed {
            Some(n) => n.to_string(),
            None => DEFAULT_SPEED_KMH.to_string(),
        }
    }

    pub fn heart_rate_bpm(&self) -> f64 {
        self.heart_rate.unwrap_or(DEFAULT_HEART_RATE_BPM)
    }

    pub fn oxygen_level_pct(&self) -> f64 {
        self.oxygen_level.unwrap_or(DEFAULT_OXYGEN_LEVEL_PCT)
    }
}

/// One entry of a client's driving history
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingRecord {
    #[serde(default)]
    pub sensor_data: Option<SensorReading>,
}

impl DrivingRecord {
    pub fn new(reading: SensorReading) -> Self {
        Self {
            sensor_data: Some(reading),
        }
    }

    pub fn reading(&self) -> SensorReading {
        self.sensor_data.clone().unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const COUNT: usize = 3;

    /// Class index used by the risk classifier (0=low, 1=medium, 2=high)
    pub fn class_index(self) -> usize {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }

    /// Out-of-range classes saturate to `High`
    pub fn from_class_index(index: usize) -> Self {
        match index {
            0 => RiskLevel::Low,
            1 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-reading model output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccidentAnalysis {
    pub accident_detected: bool,
    pub accident_probability: f64,
    pub anomaly_score: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
}

/// Risk summary over a driving history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

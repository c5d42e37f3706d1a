use serde::{Deserialize, Serialize};

use crate::features::{magnitude, planar_magnitude};
use crate::types::SensorReading;

// Thresholds
const SPEEDING_THRESHOLD_KMH: f64 = 80.0;
const HARSH_ACCEL_THRESHOLD: f64 = 8.0; // m/s², horizontal plane only
const SHARP_TURN_THRESHOLD: f64 = 2.0; // rad/s
const PENALTY_PER_BEHAVIOR: u32 = 20;
const MAX_SAFETY_SCORE: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskyBehavior {
    Speeding,
    HarshAcceleration,
    SharpTurning,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorReport {
    pub risky_behaviors: Vec<RiskyBehavior>,
    pub alerts: Vec<String>,
    pub safety_score: u32,
    pub recommendations: Vec<String>,
}

/// Flag risky driving in a single reading
pub fn predict(reading: &SensorReading) -> BehaviorReport {
    let mut risky_behaviors = Vec::new();
    let mut alerts = Vec::new();

    let speed = reading.speed_kmh();
    if speed > SPEEDING_THRESHOLD_KMH {
        risky_behaviors.push(RiskyBehavior::Speeding);
        alerts.push(format!(
            "Speed warning: {} km/h detected",
            reading.speed_label()
        ));
    }

    // Gravity sits on z, so only the planar component counts here
    if planar_magnitude(&reading.accel()) > HARSH_ACCEL_THRESHOLD {
        risky_behaviors.push(RiskyBehavior::HarshAcceleration);
        alerts.push("Harsh acceleration detected".to_string());
    }

    if magnitude(&reading.gyro()) > SHARP_TURN_THRESHOLD {
        risky_behaviors.push(RiskyBehavior::SharpTurning);
        alerts.push("Sharp turning detected".to_string());
    }

    let penalty = PENALTY_PER_BEHAVIOR * risky_behaviors.len() as u32;
    let safety_score = MAX_SAFETY_SCORE.saturating_sub(penalty);

    BehaviorReport {
        risky_behaviors,
        alerts,
        safety_score,
        recommendations: vec![
            "Maintain steady speed".to_string(),
            "Smooth acceleration and braking".to_string(),
            "Gentle steering inputs".to_string(),
        ],
    }
}

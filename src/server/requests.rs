use serde::Deserialize;

use crate::types::{DrivingRecord, SensorReading};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeEmergencyRequest {
    #[serde(default)]
    pub sensor_data: Option<SensorReading>,
    #[serde(default, rename = "type")]
    pub emergency_type: Option<String>,
    /// Echoed into logs only
    #[serde(default)]
    pub location: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessRiskRequest {
    #[serde(default)]
    pub driving_history: Option<Vec<DrivingRecord>>,
    #[serde(default)]
    pub current_sensor_data: Option<SensorReading>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictBehaviorRequest {
    #[serde(default)]
    pub sensor_data: Option<SensorReading>,
}

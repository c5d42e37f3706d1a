use serde::Serialize;

use crate::emergency::Urgency;
use crate::types::{AccidentAnalysis, RiskLevel};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeEmergencyResponse {
    pub accident_probability: f64,
    pub risk_factors: Vec<String>,
    pub recommended_action: String,
    pub confidence: f64,
    pub urgency: Urgency,
    pub analysis: AccidentAnalysis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingStatus {
    pub safe: bool,
    pub alert_level: RiskLevel,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessRiskResponse {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub current_driving_status: DrivingStatus,
}

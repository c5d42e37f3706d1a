use axum::extract::State;
use axum::Json;
use log::{debug, info};

use super::error::ApiError;
use super::extract::AppJson;
use super::requests::{AnalyzeEmergencyRequest, AssessRiskRequest, PredictBehaviorRequest};
use super::responses::{AnalyzeEmergencyResponse, AssessRiskResponse, DrivingStatus};
use super::AppState;
use crate::behavior::{self, BehaviorReport};
use crate::emergency;
use crate::status::ServiceStatus;

pub async fn health(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus::new(state.detector.is_trained()))
}

pub async fn analyze_emergency(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeEmergencyRequest>,
) -> Result<Json<AnalyzeEmergencyResponse>, ApiError> {
    let reading = request.sensor_data.unwrap_or_default();
    let emergency_type = request.emergency_type.as_deref().unwrap_or("unknown");
    debug!(
        "analyze-emergency type={emergency_type} location={:?}",
        request.location
    );

    let analysis = state.detector.detect_accident(&reading)?;
    let triage = emergency::triage(&reading, &analysis);

    if analysis.accident_detected {
        info!(
            "Accident detected (type={emergency_type}, p={:.3})",
            analysis.accident_probability
        );
    }

    Ok(Json(AnalyzeEmergencyResponse {
        accident_probability: analysis.accident_probability,
        risk_factors: triage.risk_factors,
        recommended_action: triage.recommended_action,
        confidence: analysis.confidence,
        urgency: triage.urgency,
        analysis,
    }))
}

pub async fn assess_risk(
    State(state): State<AppState>,
    AppJson(request): AppJson<AssessRiskRequest>,
) -> Result<Json<AssessRiskResponse>, ApiError> {
    let history = request.driving_history.unwrap_or_default();
    let assessment = state.detector.assess_driving_risk(&history);

    let current = request.current_sensor_data.unwrap_or_default();
    let current_analysis = state.detector.detect_accident(&current)?;

    debug!(
        "assess-risk records={} score={} level={}",
        history.len(),
        assessment.risk_score,
        assessment.risk_level
    );

    Ok(Json(AssessRiskResponse {
        risk_score: assessment.risk_score,
        risk_level: assessment.risk_level,
        risk_factors: assessment.risk_factors,
        recommendations: assessment.recommendations,
        current_driving_status: DrivingStatus {
            safe: !current_analysis.accident_detected,
            alert_level: current_analysis.risk_level,
        },
    }))
}

pub async fn predict_behavior(
    AppJson(request): AppJson<PredictBehaviorRequest>,
) -> Result<Json<BehaviorReport>, ApiError> {
    let reading = request.sensor_data.unwrap_or_default();
    Ok(Json(behavior::predict(&reading)))
}

mod error;
mod extract;
mod handlers;
mod requests;
mod responses;

pub use error::ApiError;

use axum::{
    routing::{get, post},
    Router,
};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::detector::AccidentDetector;

#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<AccidentDetector>,
}

impl AppState {
    pub fn new(detector: AccidentDetector) -> Self {
        Self {
            detector: Arc::new(detector),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/analyze-emergency", post(handlers::analyze_emergency))
        .route("/api/assess-risk", post(handlers::assess_risk))
        .route("/api/predict-behavior", post(handlers::predict_behavior))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::tests::test_config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::OnceLock;
    use tower::ServiceExt;

    fn trained_state() -> AppState {
        static DETECTOR: OnceLock<Arc<AccidentDetector>> = OnceLock::new();
        let detector = DETECTOR
            .get_or_init(|| Arc::new(AccidentDetector::new(&test_config())))
            .clone();
        AppState { detector }
    }

    fn untrained_state() -> AppState {
        AppState::new(AccidentDetector::untrained())
    }

    async fn read_body(resp: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    // ── GET /health ─────────────────────────────────────────────────

    #[tokio::test]
    async fn health_reports_trained_models() {
        let app = build_router(trained_state());
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "AI Emergency Detection Service");
        assert_eq!(body["models_trained"], true);
    }

    #[tokio::test]
    async fn health_reports_untrained_models() {
        let app = build_router(untrained_state());
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await["models_trained"], false);
    }

    // ── POST /api/analyze-emergency ─────────────────────────────────

    #[tokio::test]
    async fn analyze_emergency_flags_crash() {
        let app = build_router(trained_state());
        let body = serde_json::json!({
            "type": "collision",
            "location": { "lat": 40.7, "lng": -74.0 },
            "sensorData": {
                "accelerometer": { "x": 15.0, "y": -15.0, "z": -20.0 },
                "gyroscope": { "x": 5.0, "y": -5.0, "z": 5.0 },
                "speed": 90,
                "heartRate": 120,
                "oxygenLevel": 92
            }
        });
        let resp = app
            .oneshot(post_json("/api/analyze-emergency", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_body(resp).await;
        assert_eq!(body["urgency"], "critical");
        assert_eq!(body["recommendedAction"], "Immediate medical attention required");
        assert_eq!(body["analysis"]["accident_detected"], true);
        assert_eq!(body["analysis"]["risk_level"], "high");
        let factors = body["riskFactors"].as_array().unwrap();
        assert!(factors.contains(&serde_json::json!("High impact detected")));
        assert!(factors.contains(&serde_json::json!("Elevated heart rate")));
        assert!(factors.contains(&serde_json::json!("Low oxygen saturation")));
        assert!(body["accidentProbability"].as_f64().unwrap() > 0.7);
    }

    #[tokio::test]
    async fn analyze_emergency_empty_body_uses_defaults() {
        let app = build_router(trained_state());
        let resp = app
            .oneshot(post_json("/api/analyze-emergency", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_body(resp).await;
        assert_eq!(body["urgency"], "medium");
        assert_eq!(body["recommendedAction"], "Monitor situation");
        assert_eq!(body["riskFactors"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn analyze_emergency_untrained_returns_500() {
        let app = build_router(untrained_state());
        let resp = app
            .oneshot(post_json("/api/analyze-emergency", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_body(resp).await["error"], "Models not trained");
    }

    #[tokio::test]
    async fn malformed_json_returns_500() {
        let app = build_router(trained_state());
        let resp = app
            .oneshot(
                Request::post("/api/analyze-emergency")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_body(resp).await;
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn missing_content_type_returns_500() {
        let app = build_router(trained_state());
        let resp = app
            .oneshot(
                Request::post("/api/predict-behavior")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ── POST /api/assess-risk ───────────────────────────────────────

    #[tokio::test]
    async fn assess_risk_empty_history_is_neutral() {
        let app = build_router(trained_state());
        let resp = app
            .oneshot(post_json("/api/assess-risk", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_body(resp).await;
        assert_eq!(body["riskScore"], 50.0);
        assert_eq!(body["riskLevel"], "medium");
        assert_eq!(body["riskFactors"], serde_json::json!([]));
        assert_eq!(body["recommendations"], serde_json::json!([]));
        assert_eq!(body["currentDrivingStatus"]["safe"], true);
        assert_eq!(body["currentDrivingStatus"]["alertLevel"], "low");
    }

    #[tokio::test]
    async fn assess_risk_aggressive_history() {
        let app = build_router(trained_state());
        let record = serde_json::json!({
            "sensorData": {
                "speed": 130,
                "accelerometer": { "x": 14.0, "y": 0.0, "z": -9.8 },
                "gyroscope": { "x": 0.0, "y": 0.0, "z": 3.5 }
            }
        });
        let body = serde_json::json!({
            "drivingHistory": [record.clone(), record, {}],
            "currentSensorData": { "speed": 40 }
        });
        let resp = app
            .oneshot(post_json("/api/assess-risk", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_body(resp).await;
        assert_eq!(body["riskScore"], 100.0);
        assert_eq!(body["riskLevel"], "high");
        assert_eq!(body["riskFactors"].as_array().unwrap().len(), 3);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn assess_risk_untrained_returns_500() {
        let app = build_router(untrained_state());
        let resp = app
            .oneshot(post_json("/api/assess-risk", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ── POST /api/predict-behavior ──────────────────────────────────

    #[tokio::test]
    async fn predict_behavior_flags_speeding_and_turning() {
        let app = build_router(trained_state());
        let body = serde_json::json!({
            "sensorData": {
                "speed": 95,
                "gyroscope": { "x": 0.0, "y": 0.0, "z": 2.5 }
            }
        });
        let resp = app
            .oneshot(post_json("/api/predict-behavior", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_body(resp).await;
        assert_eq!(
            body["riskyBehaviors"],
            serde_json::json!(["speeding", "sharp_turning"])
        );
        assert_eq!(body["alerts"][0], "Speed warning: 95 km/h detected");
        assert_eq!(body["safetyScore"], 60);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn predict_behavior_works_without_models() {
        let app = build_router(untrained_state());
        let resp = app
            .oneshot(post_json("/api/predict-behavior", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await["safetyScore"], 100);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = build_router(untrained_state());
        let resp = app
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

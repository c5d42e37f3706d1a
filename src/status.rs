use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "AI Emergency Detection Service";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub models_trained: bool,
    pub timestamp: String,
}

impl ServiceStatus {
    pub fn new(models_trained: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
            models_trained,
            timestamp: current_timestamp(),
        }
    }
}

/// RFC 3339 UTC timestamp, millisecond precision
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_training() {
        let status = ServiceStatus::new(false);
        assert_eq!(status.status, "healthy");
        assert_eq!(status.version, "1.0.0");
        assert!(!status.models_trained);
        assert!(status.timestamp.ends_with('Z'));
    }
}

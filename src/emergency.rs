use serde::{Deserialize, Serialize};

use crate::risk::{HEART_RATE_ELEVATED_BPM, OXYGEN_LOW_PCT};
use crate::types::{AccidentAnalysis, SensorReading};

pub const DEFAULT_ACTION: &str = "Monitor situation";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Medium,
}

/// What to tell the responder about one analysed reading
#[derive(Clone, Debug, PartialEq)]
pub struct Triage {
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub recommended_action: String,
    pub urgency: Urgency,
}

pub fn triage(reading: &SensorReading, analysis: &AccidentAnalysis) -> Triage {
    let mut risk_factors = Vec::new();
    let mut recommendations = Vec::new();

    if analysis.accident_detected {
        recommendations.push("Immediate medical attention required".to_string());
        recommendations.push("Contact emergency services".to_string());
        recommendations.push("Do not move if spinal injury suspected".to_string());
        risk_factors.push("High impact detected".to_string());
    }

    if reading.heart_rate_bpm() > HEART_RATE_ELEVATED_BPM {
        risk_factors.push("Elevated heart rate".to_string());
        recommendations.push("Monitor vital signs".to_string());
    }

    if reading.oxygen_level_pct() < OXYGEN_LOW_PCT {
        risk_factors.push("Low oxygen saturation".to_string());
        recommendations.push("Ensure clear airway".to_string());
    }

    let recommended_action = recommendations
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_ACTION.to_string());

    let urgency = if analysis.accident_detected {
        Urgency::Critical
    } else {
        Urgency::Medium
    };

    Triage {
        risk_factors,
        recommendations,
        recommended_action,
        urgency,
    }
}

use crate::features::{accel_of, gyro_of, magnitude};
use crate::types::{
    DrivingRecord, FeatureVector, RiskAssessment, RiskLevel, IDX_HEART_RATE, IDX_OXYGEN_LEVEL,
    IDX_SPEED,
};

// Training-label thresholds
const LABEL_SPEED_HIGH_KMH: f64 = 80.0;
const LABEL_SPEED_ELEVATED_KMH: f64 = 60.0;
const LABEL_ACCEL_HIGH: f64 = 12.0; // m/s²
const LABEL_ACCEL_ELEVATED: f64 = 10.0;
const LABEL_GYRO_HIGH: f64 = 2.0; // rad/s
const LABEL_GYRO_ELEVATED: f64 = 1.0;
const LABEL_HIGH_POINTS: u32 = 4;
const LABEL_MEDIUM_POINTS: u32 = 2;

/// Vitals outside these bounds count as a health risk
pub const HEART_RATE_ELEVATED_BPM: f64 = 100.0;
pub const OXYGEN_LOW_PCT: f64 = 95.0;

// Driving-history thresholds
pub const HISTORY_WINDOW: usize = 100;
const HISTORY_SPEED_EXCESSIVE_KMH: f64 = 100.0;
const HISTORY_SPEED_HIGH_KMH: f64 = 80.0;
const HISTORY_ACCEL_HARD: f64 = 15.0;
const HISTORY_ACCEL_HIGH: f64 = 12.0;
const HISTORY_GYRO_SHARP: f64 = 3.0;
const HISTORY_GYRO_HIGH: f64 = 2.0;
const BASELINE_SCORE: f64 = 50.0;
const HIGH_SCORE: f64 = 80.0;
const MEDIUM_SCORE: f64 = 60.0;

pub const FACTOR_EXCESSIVE_SPEEDING: &str = "Excessive speeding detected";
pub const FACTOR_HARD_BRAKING: &str = "Hard braking/acceleration detected";
pub const FACTOR_SHARP_TURNS: &str = "Sharp turns detected";

/// Weighted threshold points for one feature row
pub fn risk_points(features: &FeatureVector) -> u32 {
    let mut points = 0;

    let speed = features[IDX_SPEED];
    if speed > LABEL_SPEED_HIGH_KMH {
        points += 2;
    } else if speed > LABEL_SPEED_ELEVATED_KMH {
        points += 1;
    }

    let accel = magnitude(&accel_of(features));
    if accel > LABEL_ACCEL_HIGH {
        points += 2;
    } else if accel > LABEL_ACCEL_ELEVATED {
        points += 1;
    }

    let gyro = magnitude(&gyro_of(features));
    if gyro > LABEL_GYRO_HIGH {
        points += 2;
    } else if gyro > LABEL_GYRO_ELEVATED {
        points += 1;
    }

    if features[IDX_HEART_RATE] > HEART_RATE_ELEVATED_BPM
        || features[IDX_OXYGEN_LEVEL] < OXYGEN_LOW_PCT
    {
        points += 1;
    }

    points
}

/// Risk bucket used to label the risk classifier's training rows
pub fn label(features: &FeatureVector) -> RiskLevel {
    let points = risk_points(features);
    if points >= LABEL_HIGH_POINTS {
        RiskLevel::High
    } else if points >= LABEL_MEDIUM_POINTS {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Score the most recent `HISTORY_WINDOW` records of a driving history.
///
/// An empty history has no evidence either way and gets the neutral
/// baseline with no factors or recommendations.
pub fn assess_history(history: &[DrivingRecord]) -> RiskAssessment {
    if history.is_empty() {
        return RiskAssessment {
            risk_score: BASELINE_SCORE,
            risk_level: RiskLevel::Medium,
            risk_factors: Vec::new(),
            recommendations: Vec::new(),
        };
    }

    let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
    let mut risk_factors: Vec<String> = Vec::new();
    let mut total = 0.0;

    let mut note = |factor: &str| {
        if !risk_factors.iter().any(|f| f == factor) {
            risk_factors.push(factor.to_string());
        }
    };

    for record in recent {
        let reading = record.reading();

        let speed = reading.speed_kmh();
        if speed > HISTORY_SPEED_EXCESSIVE_KMH {
            note(FACTOR_EXCESSIVE_SPEEDING);
            total += 10.0;
        } else if speed > HISTORY_SPEED_HIGH_KMH {
            total += 5.0;
        }

        let accel = magnitude(&reading.accel());
        if accel > HISTORY_ACCEL_HARD {
            note(FACTOR_HARD_BRAKING);
            total += 8.0;
        } else if accel > HISTORY_ACCEL_HIGH {
            total += 4.0;
        }

        let gyro = magnitude(&reading.gyro());
        if gyro > HISTORY_GYRO_SHARP {
            note(FACTOR_SHARP_TURNS);
            total += 6.0;
        } else if gyro > HISTORY_GYRO_HIGH {
            total += 3.0;
        }
    }

    let raw = BASELINE_SCORE + total / recent.len() as f64 * 10.0;
    let risk_score = round1(raw.clamp(0.0, 100.0));
    let risk_level = score_level(risk_score);

    RiskAssessment {
        risk_score,
        risk_level,
        risk_factors,
        recommendations: safety_recommendations(risk_level),
    }
}

pub fn score_level(score: f64) -> RiskLevel {
    if score > HIGH_SCORE {
        RiskLevel::High
    } else if score > MEDIUM_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn safety_recommendations(level: RiskLevel) -> Vec<String> {
    let tips: &[&str] = match level {
        RiskLevel::Low => &[
            "Continue maintaining safe driving habits",
            "Regular vehicle maintenance checks",
            "Stay alert and avoid distractions",
        ],
        RiskLevel::Medium => &[
            "Reduce speed and maintain safe following distance",
            "Avoid aggressive acceleration and braking",
            "Take breaks during long drives",
            "Check tire pressure and brake condition",
        ],
        RiskLevel::High => &[
            "Immediately reduce driving speed",
            "Avoid driving during peak traffic hours",
            "Consider defensive driving course",
            "Have vehicle inspected by mechanic",
            "Take frequent breaks and stay hydrated",
            "Avoid night driving if possible",
        ],
    };
    tips.iter().map(|s| s.to_string()).collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

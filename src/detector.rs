//! Accident detector
//!
//! Owns every fitted model. Training happens once, up front, on synthetic data;
//! afterwards the detector is read-only and safe to share across requests.

use log::{debug, error, info};
use ndarray::{Array1, ArrayView1};

use crate::error::{DetectorError, DetectorResult};
use crate::features;
use crate::models::{ForestConfig, IsolationConfig, IsolationForest, RandomForest, StandardScaler};
use crate::risk;
use crate::synthetic::{self, LABEL_ACCIDENT, LABEL_NORMAL};
use crate::types::{
    AccidentAnalysis, DrivingRecord, FeatureVector, RiskAssessment, RiskLevel, SensorReading,
};

/// Probability above which a reading is an accident on its own
const ACCIDENT_THRESHOLD: f64 = 0.7;
/// Lower bar that applies when the reading is also anomalous
const ANOMALOUS_ACCIDENT_THRESHOLD: f64 = 0.4;

#[derive(Clone, Debug)]
pub struct DetectorConfig {
    pub n_samples: usize,
    pub seed: u64,
    pub forest: ForestConfig,
    pub isolation: IsolationConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            n_samples: synthetic::DEFAULT_SAMPLES,
            seed: synthetic::DEFAULT_SEED,
            forest: ForestConfig::default(),
            isolation: IsolationConfig::default(),
        }
    }
}

struct TrainedModels {
    scaler: StandardScaler,
    accident_model: RandomForest,
    anomaly_detector: IsolationForest,
    risk_model: RandomForest,
}

pub struct AccidentDetector {
    models: Option<TrainedModels>,
}

impl AccidentDetector {
    /// Train all models. A training failure is logged and leaves the
    /// detector untrained rather than aborting start-up.
    pub fn new(config: &DetectorConfig) -> Self {
        info!("Training accident detection models...");
        match Self::train(config) {
            Ok(models) => {
                info!("Models trained successfully");
                Self {
                    models: Some(models),
                }
            }
            Err(e) => {
                error!("Error training models: {e}");
                Self::untrained()
            }
        }
    }

    pub fn untrained() -> Self {
        Self { models: None }
    }

    pub fn is_trained(&self) -> bool {
        self.models.is_some()
    }

    fn train(config: &DetectorConfig) -> DetectorResult<TrainedModels> {
        let set = synthetic::generate(config.n_samples, config.seed)?;

        let scaler = StandardScaler::fit(&set.features)?;
        let scaled = scaler.transform(&set.features)?;

        let accident_model = RandomForest::fit(scaled.view(), &set.labels, 2, &config.forest)?;

        // Anomalies are judged against normal driving only
        let normal = set.rows_of(&scaled, LABEL_NORMAL);
        let anomaly_detector = IsolationForest::fit(normal.view(), &config.isolation)?;

        let risk_labels: Vec<usize> = set
            .features
            .rows()
            .into_iter()
            .map(|row| {
                risk::label(&FeatureVector::from_iterator(row.iter().copied())).class_index()
            })
            .collect();
        let risk_model =
            RandomForest::fit(scaled.view(), &risk_labels, RiskLevel::COUNT, &config.forest)?;

        info!(
            "Trained on {} samples ({} accident)",
            set.len(),
            set.indices_of(LABEL_ACCIDENT).len()
        );
        debug!(
            "Features {:?}; accident model {} classes, risk model {} classes, anomaly offset {:.4}",
            features::FEATURE_NAMES,
            accident_model.n_classes(),
            risk_model.n_classes(),
            anomaly_detector.offset()
        );

        Ok(TrainedModels {
            scaler,
            accident_model,
            anomaly_detector,
            risk_model,
        })
    }

    pub fn detect_accident(&self, reading: &SensorReading) -> DetectorResult<AccidentAnalysis> {
        let models = self.models.as_ref().ok_or(DetectorError::NotTrained)?;

        let raw = Array1::from_iter(features::extract(reading).iter().copied());
        let scaled = models.scaler.transform_row(raw.view())?;
        let row: ArrayView1<f64> = scaled.view();

        let accident_probability = models
            .accident_model
            .predict_proba(row)?
            .get(LABEL_ACCIDENT)
            .copied()
            .unwrap_or(0.0);

        let anomaly_score = models.anomaly_detector.score_samples(row)?;
        let is_anomaly = models.anomaly_detector.is_anomalous_score(anomaly_score);

        let risk_level = RiskLevel::from_class_index(models.risk_model.predict(row)?);

        let accident_detected = accident_probability > ACCIDENT_THRESHOLD
            || (is_anomaly && accident_probability > ANOMALOUS_ACCIDENT_THRESHOLD);

        let confidence = if accident_detected {
            accident_probability
        } else {
            1.0 - accident_probability
        };

        Ok(AccidentAnalysis {
            accident_detected,
            accident_probability,
            anomaly_score,
            risk_level,
            confidence,
        })
    }

    /// History scoring is rule-based and works whether or not models trained
    pub fn assess_driving_risk(&self, history: &[DrivingRecord]) -> RiskAssessment {
        risk::assess_history(history)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::OnceLock;

    /// Reduced config so unit tests train in well under a second
    pub(crate) fn test_config() -> DetectorConfig {
        DetectorConfig {
            n_samples: 1_000,
            seed: 42,
            forest: ForestConfig {
                n_trees: 20,
                max_depth: 10,
                ..ForestConfig::default()
            },
            isolation: IsolationConfig {
                n_trees: 50,
                ..IsolationConfig::default()
            },
        }
    }

    fn trained() -> &'static AccidentDetector {
        static DETECTOR: OnceLock<AccidentDetector> = OnceLock::new();
        DETECTOR.get_or_init(|| AccidentDetector::new(&test_config()))
    }

    fn crash_reading() -> SensorReading {
        SensorReading::default()
            .with_accel(15.0, -15.0, -20.0)
            .with_gyro(5.0, -5.0, 5.0)
            .with_speed(90.0)
            .with_vitals(120.0, 92.0)
    }

    fn calm_reading() -> SensorReading {
        SensorReading::default()
            .with_accel(0.1, -0.2, -9.8)
            .with_gyro(0.0, 0.05, -0.02)
            .with_speed(40.0)
            .with_vitals(72.0, 98.0)
    }

    #[test]
    fn test_trains() {
        assert!(trained().is_trained());
    }

    #[test]
    fn test_detects_crash() {
        let analysis = trained().detect_accident(&crash_reading()).unwrap();
        assert!(analysis.accident_detected);
        assert!(analysis.accident_probability > 0.7);
        assert_eq!(analysis.confidence, analysis.accident_probability);
        assert_eq!(analysis.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_calm_driving_is_clear() {
        let analysis = trained().detect_accident(&calm_reading()).unwrap();
        assert!(!analysis.accident_detected);
        assert!(analysis.accident_probability < 0.3);
        assert!((analysis.confidence - (1.0 - analysis.accident_probability)).abs() < 1e-12);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_crash_is_more_anomalous_than_calm() {
        let crash = trained().detect_accident(&crash_reading()).unwrap();
        let calm = trained().detect_accident(&calm_reading()).unwrap();
        assert!(crash.anomaly_score < calm.anomaly_score);
        assert!(crash.anomaly_score >= -1.0 && calm.anomaly_score < 0.0);
    }

    #[test]
    fn test_outputs_in_range() {
        let analysis = trained().detect_accident(&SensorReading::default()).unwrap();
        assert!((0.0..=1.0).contains(&analysis.accident_probability));
        assert!((0.0..=1.0).contains(&analysis.confidence));
    }

    #[test]
    fn test_untrained_rejects_detection() {
        let detector = AccidentDetector::untrained();
        assert!(!detector.is_trained());
        assert_eq!(
            detector.detect_accident(&calm_reading()).unwrap_err(),
            DetectorError::NotTrained
        );
        assert_eq!(
            detector.detect_accident(&calm_reading()).unwrap_err().to_string(),
            "Models not trained"
        );
    }

    #[test]
    fn test_training_failure_leaves_untrained() {
        let config = DetectorConfig {
            n_samples: 0,
            ..test_config()
        };
        assert!(!AccidentDetector::new(&config).is_trained());
    }

    #[test]
    fn test_history_assessment_without_models() {
        let detector = AccidentDetector::untrained();
        let assessment = detector.assess_driving_risk(&[]);
        assert_eq!(assessment.risk_score, 50.0);
    }
}

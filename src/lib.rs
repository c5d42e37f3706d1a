//! Accident detection and driving-risk inference over HTTP.
//!
//! Sensor readings go through [`features`] into models trained at start-up on
//! [`synthetic`] data ([`models`]), orchestrated by [`detector`]. Rule-based
//! scoring lives in [`risk`], [`emergency`] and [`behavior`]; [`server`] is the
//! axum front end.

pub mod behavior;
pub mod detector;
pub mod emergency;
pub mod error;
pub mod features;
pub mod models;
pub mod risk;
pub mod server;
pub mod status;
pub mod synthetic;
pub mod types;

pub use detector::{AccidentDetector, DetectorConfig};
pub use error::{DetectorError, DetectorResult};
pub use types::{AccidentAnalysis, DrivingRecord, RiskAssessment, RiskLevel, SensorReading};

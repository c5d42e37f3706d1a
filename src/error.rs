use thiserror::Error;

/// Emergency detector error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    #[error("Models not trained")]
    NotTrained,

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training set has {rows} rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("Label {label} out of range for {n_classes} classes")]
    InvalidLabel { label: usize, n_classes: usize },

    #[error("Expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid training data shape: {0}")]
    Shape(String),
}

impl From<ndarray::ShapeError> for DetectorError {
    fn from(err: ndarray::ShapeError) -> Self {
        DetectorError::Shape(err.to_string())
    }
}

/// Result type for detector operations
pub type DetectorResult<T> = Result<T, DetectorError>;

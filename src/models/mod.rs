pub mod forest;
pub mod isolation;
pub mod scaler;

pub use forest::{ForestConfig, RandomForest};
pub use isolation::{IsolationConfig, IsolationForest};
pub use scaler::StandardScaler;

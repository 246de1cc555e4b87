pub mod aggregator;
pub mod estimator;
pub mod predictor;
pub mod resolver;

pub use predictor::Predictor;

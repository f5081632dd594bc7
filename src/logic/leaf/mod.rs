pub mod estimator;
pub mod hsv;

pub use estimator::LeafColorEstimator;

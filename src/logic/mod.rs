pub mod advisories;
pub mod calculations;
pub mod fuzzy;
pub mod justification;
pub mod leaf;
pub mod recommender;

pub use leaf::LeafColorEstimator;
pub use recommender::{FertilizerRecommendation, Recommender};

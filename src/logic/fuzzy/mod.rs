pub mod engine;
pub mod membership;
pub mod rules;

pub use engine::{FuzzyInferenceEngine, InferenceTrace, LEACHING_THRESHOLD};

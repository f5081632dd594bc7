pub mod engine;
pub mod late_season;
pub mod rainfall_leaching;
pub mod schedule_missed;

pub use engine::AdvisoryEngine;

use crate::logic::fuzzy::InferenceTrace;
use crate::models::{Advisory, PlantObservation};

/// Trait for agronomic advisories attached to a recommendation
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule and return an advisory if conditions are met
    fn evaluate(&self, observation: &PlantObservation, trace: &InferenceTrace)
        -> Option<Advisory>;
}

use super::advisories::AdvisoryEngine;
use super::calculations::{application_schedule, product_requirement};
use super::fuzzy::{FuzzyInferenceEngine, InferenceTrace};
use super::justification::justification;
use crate::models::{
    Advisory, FertilizerContents, LeafColorEstimate, LeafColorSource, NutrientDosage,
    PlantObservation, ProductRequirement, RoundedDosage, ScheduleEntry,
};
use serde::Serialize;
use tracing::info;

/// Complete result for one observation.
#[derive(Debug, Clone, Serialize)]
pub struct FertilizerRecommendation {
    pub observation: PlantObservation,
    pub leaf_source: LeafColorSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf_estimate: Option<LeafColorEstimate>,
    pub trace: InferenceTrace,
    pub dosage: RoundedDosage,
    /// `None` once every application window has passed
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub products: ProductRequirement,
    pub justification: String,
    pub advisories: Vec<Advisory>,
}

impl FertilizerRecommendation {
    pub fn with_leaf_estimate(mut self, estimate: LeafColorEstimate) -> Self {
        self.leaf_estimate = Some(estimate);
        self
    }
}

pub struct Recommender {
    engine: FuzzyInferenceEngine,
    advisories: AdvisoryEngine,
    contents: FertilizerContents,
}

impl Recommender {
    pub fn new(contents: FertilizerContents) -> Self {
        Self {
            engine: FuzzyInferenceEngine::new(),
            advisories: AdvisoryEngine::new(),
            contents,
        }
    }

    /// Dosage only, without schedule or advisories.
    pub fn preview(&self, observation: &PlantObservation) -> NutrientDosage {
        self.engine.infer(observation)
    }

    pub fn recommend(
        &self,
        observation: PlantObservation,
        leaf_source: LeafColorSource,
    ) -> FertilizerRecommendation {
        let trace = self.engine.infer_detailed(&observation);
        let dosage = trace.dosage.rounded();
        let schedule = application_schedule(&dosage, observation.age_days);
        let products = product_requirement(&dosage, &self.contents);
        let advisories = self.advisories.evaluate(&observation, &trace);

        info!(
            age_days = observation.age_days,
            leaf_color = observation.leaf_color,
            nitrogen = dosage.nitrogen,
            phosphorus = dosage.phosphorus,
            potassium = dosage.potassium,
            advisories = advisories.len(),
            "Recommendation computed"
        );

        FertilizerRecommendation {
            justification: justification(&observation),
            observation,
            leaf_source,
            leaf_estimate: None,
            trace,
            dosage,
            schedule,
            products,
            advisories,
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(FertilizerContents::default())
    }
}

use super::membership::{
    age_membership, leaf_membership, rainfall_membership, AgeMembership, LeafMembership,
    RainfallMembership,
};
use super::rules::{FuzzyRule, MEDIUM_NPK, RULE_BASE};
use crate::models::{soil_factor, NutrientDosage, PlantObservation};
use serde::Serialize;
use tracing::debug;

/// Leaching adjustment applies only above this "high rainfall" degree.
pub const LEACHING_THRESHOLD: f64 = 0.3;

const LEACHING_N: f64 = 0.3;
const LEACHING_P: f64 = 0.2;
const LEACHING_K: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleActivation {
    pub rule_id: &'static str,
    pub strength: f64,
    pub output: NutrientDosage,
}

/// Every intermediate value of one inference run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceTrace {
    pub age: AgeMembership,
    pub leaf: LeafMembership,
    pub rainfall: RainfallMembership,
    pub activations: Vec<RuleActivation>,
    /// Weighted average before rainfall and soil adjustment
    pub defuzzified: NutrientDosage,
    pub used_fallback: bool,
    pub leaching_applied: bool,
    pub soil_factor: f64,
    pub dosage: NutrientDosage,
}

impl InferenceTrace {
    pub fn total_strength(&self) -> f64 {
        self.activations
            .iter()
            .filter(|a| a.strength > 0.0)
            .map(|a| a.strength)
            .sum()
    }

    /// Activation with the largest strength; earlier rules win ties.
    pub fn dominant_rule(&self) -> Option<&RuleActivation> {
        self.activations
            .iter()
            .filter(|a| a.strength > 0.0)
            .fold(None, |best: Option<&RuleActivation>, a| match best {
                Some(b) if b.strength >= a.strength => Some(b),
                _ => Some(a),
            })
    }
}

/// Mamdani-style inference over the fixed rice fertilization rule base.
pub struct FuzzyInferenceEngine {
    rules: &'static [FuzzyRule],
}

impl FuzzyInferenceEngine {
    pub fn new() -> Self {
        Self { rules: &RULE_BASE }
    }

    pub fn infer(&self, observation: &PlantObservation) -> NutrientDosage {
        self.infer_detailed(observation).dosage
    }

    pub fn infer_detailed(&self, observation: &PlantObservation) -> InferenceTrace {
        let age = age_membership(observation.age_days as f64);
        let leaf = leaf_membership(observation.leaf_color);
        let rainfall = rainfall_membership(observation.rainfall_mm);

        let activations = self.activate(&age, &leaf);
        let (defuzzified, used_fallback) = match defuzzify(&activations) {
            Some(dosage) => (dosage, false),
            None => {
                debug!("No rule fired, using medium NPK fallback");
                (MEDIUM_NPK, true)
            }
        };

        let leaching_applied = rainfall.high > LEACHING_THRESHOLD;
        let leached = if leaching_applied {
            apply_leaching(defuzzified, rainfall.high)
        } else {
            defuzzified
        };

        let soil_factor = soil_factor(observation.soil_type);
        let dosage = leached.scaled(soil_factor);

        debug!(
            age_days = observation.age_days,
            leaf_color = observation.leaf_color,
            rainfall_mm = observation.rainfall_mm,
            soil = observation.soil_label(),
            nitrogen = dosage.nitrogen,
            phosphorus = dosage.phosphorus,
            potassium = dosage.potassium,
            "Fuzzy inference complete"
        );

        InferenceTrace {
            age,
            leaf,
            rainfall,
            activations,
            defuzzified,
            used_fallback,
            leaching_applied,
            soil_factor,
            dosage,
        }
    }

    /// Firing strength of every rule, in rule-base order.
    pub fn activate(&self, age: &AgeMembership, leaf: &LeafMembership) -> Vec<RuleActivation> {
        self.rules
            .iter()
            .map(|rule| RuleActivation {
                rule_id: rule.id,
                strength: age.degree(rule.age).min(leaf.degree(rule.leaf)),
                output: rule.output,
            })
            .collect()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, NutrientDosage)> {
        self.rules.iter().map(|r| (r.id, r.output)).collect()
    }
}

impl Default for FuzzyInferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Weighted average of the output singletons of rules with positive
/// strength. Returns `None` when no rule fired.
pub fn defuzzify(activations: &[RuleActivation]) -> Option<NutrientDosage> {
    let (total, n, p, k) = activations
        .iter()
        .filter(|a| a.strength > 0.0)
        .fold((0.0, 0.0, 0.0, 0.0), |(total, n, p, k), a| {
            (
                total + a.strength,
                n + a.strength * a.output.nitrogen,
                p + a.strength * a.output.phosphorus,
                k + a.strength * a.output.potassium,
            )
        });

    if total == 0.0 {
        None
    } else {
        Some(NutrientDosage::new(n / total, p / total, k / total))
    }
}

fn apply_leaching(dosage: NutrientDosage, high: f64) -> NutrientDosage {
    NutrientDosage::new(
        dosage.nitrogen * (1.0 - high * LEACHING_N),
        dosage.phosphorus * (1.0 - high * LEACHING_P),
        dosage.potassium * (1.0 - high * LEACHING_K),
    )
}

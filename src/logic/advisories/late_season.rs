use super::Rule;
use crate::logic::calculations::LATE_SEASON_DAYS;
use crate::logic::fuzzy::InferenceTrace;
use crate::models::{Advisory, PlantObservation, Severity};

/// Late season rule
///
/// Past 90 days after planting the crop is filling grain. Nutrient uptake
/// from soil-applied fertilizer is too low to justify another application.
pub struct LateSeasonRule;

impl Rule for LateSeasonRule {
    fn id(&self) -> &'static str {
        "late_season"
    }

    fn name(&self) -> &'static str {
        "Late Season Fertilization"
    }

    fn evaluate(
        &self,
        observation: &PlantObservation,
        _trace: &InferenceTrace,
    ) -> Option<Advisory> {
        if observation.age_days <= LATE_SEASON_DAYS {
            return None;
        }

        Some(
            Advisory::new(
                self.id(),
                Severity::Critical,
                "Fertilization Window Has Passed",
                format!(
                    "Plant age ({} days) exceeds {} days after planting. \
                     Further fertilization is not recommended.",
                    observation.age_days, LATE_SEASON_DAYS
                ),
            )
            .with_explanation(
                "During grain filling the plant draws on nitrogen already stored in leaves \
                 and stems. Fertilizer applied this late is mostly lost to runoff and \
                 leaching instead of increasing yield.",
            )
            .with_data_point("Plant Age", format!("{} days", observation.age_days))
            .with_data_point("Cutoff", format!("{} days", LATE_SEASON_DAYS))
            .with_action(
                "Skip further applications this season. Use the computed dosage as a \
                 reference for planning the next planting.",
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::fuzzy::FuzzyInferenceEngine;

    fn evaluate(age: u32) -> Option<Advisory> {
        let obs = PlantObservation::new(age, 6.0, 150.0, None);
        let trace = FuzzyInferenceEngine::new().infer_detailed(&obs);
        LateSeasonRule.evaluate(&obs, &trace)
    }

    #[test]
    fn silent_up_to_ninety_days() {
        assert!(evaluate(45).is_none());
        assert!(evaluate(90).is_none());
    }

    #[test]
    fn critical_after_ninety_days() {
        let advisory = evaluate(91).unwrap();
        assert_eq!(advisory.severity, Severity::Critical);
        assert!(advisory.description.contains("91 days"));
    }
}

use super::Rule;
use crate::logic::fuzzy::{InferenceTrace, LEACHING_THRESHOLD};
use crate::models::{Advisory, PlantObservation, Severity};

/// Reports the rainfall reduction applied to the dosage.
pub struct RainfallLeachingRule;

impl Rule for RainfallLeachingRule {
    fn id(&self) -> &'static str {
        "rainfall_leaching"
    }

    fn name(&self) -> &'static str {
        "Rainfall Leaching Adjustment"
    }

    fn evaluate(
        &self,
        observation: &PlantObservation,
        trace: &InferenceTrace,
    ) -> Option<Advisory> {
        if !trace.leaching_applied {
            return None;
        }

        let reduction = |before: f64, after: f64| {
            if before > 0.0 {
                (1.0 - after / before) * 100.0
            } else {
                0.0
            }
        };

        // Compare against the soil-scaled value so only the rainfall share shows
        let unleached = trace.defuzzified.scaled(trace.soil_factor);
        let n_cut = reduction(unleached.nitrogen, trace.dosage.nitrogen);
        let p_cut = reduction(unleached.phosphorus, trace.dosage.phosphorus);
        let k_cut = reduction(unleached.potassium, trace.dosage.potassium);

        Some(
            Advisory::new(
                self.id(),
                Severity::Advisory,
                "Dosage Reduced for Heavy Rainfall",
                format!(
                    "Monthly rainfall of {:.0} mm exceeds the leaching threshold. \
                     Dosage reduced by N {:.0}%, P {:.0}%, K {:.0}%.",
                    observation.rainfall_mm, n_cut, p_cut, k_cut
                ),
            )
            .with_explanation(
                "Heavy rain moves soluble nutrients below the root zone, nitrogen most of \
                 all. Smaller split doses lose less to leaching than one large application.",
            )
            .with_data_point("Rainfall", format!("{:.0} mm/month", observation.rainfall_mm))
            .with_data_point("High Rainfall Degree", format!("{:.2}", trace.rainfall.high))
            .with_data_point("Threshold", format!("{:.2}", LEACHING_THRESHOLD))
            .with_action(
                "Avoid applying immediately before forecast heavy rain and keep field \
                 drainage outlets closed for a few days after application.",
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::fuzzy::FuzzyInferenceEngine;
    use crate::models::SoilType;

    fn evaluate(rainfall: f64, soil: SoilType) -> Option<Advisory> {
        let obs = PlantObservation::new(30, 5.0, rainfall, Some(soil));
        let trace = FuzzyInferenceEngine::new().infer_detailed(&obs);
        RainfallLeachingRule.evaluate(&obs, &trace)
    }

    #[test]
    fn silent_inside_dead_band() {
        assert!(evaluate(150.0, SoilType::Loam).is_none());
        assert!(evaluate(276.0, SoilType::Loam).is_none());
    }

    #[test]
    fn reports_reductions_independent_of_soil() {
        // high = 1.0: N -30%, P -20%, K -25%
        for soil in [SoilType::Loam, SoilType::Sand] {
            let advisory = evaluate(600.0, soil).unwrap();
            assert_eq!(advisory.severity, Severity::Advisory);
            assert!(
                advisory.description.contains("N 30%, P 20%, K 25%"),
                "unexpected description: {}",
                advisory.description
            );
        }
    }
}

use super::Rule;
use crate::logic::calculations::SCHEDULE_CUTOFF_DAYS;
use crate::logic::fuzzy::InferenceTrace;
use crate::models::{Advisory, ApplicationStage, PlantObservation, Severity};

/// Missed schedule rule
///
/// The split schedule ends with the second top-dressing around day 45.
/// Once its grace period is over the crop has entered the ripening phase
/// and no application window remains.
pub struct ScheduleMissedRule;

impl Rule for ScheduleMissedRule {
    fn id(&self) -> &'static str {
        "schedule_missed"
    }

    fn name(&self) -> &'static str {
        "Application Schedule Passed"
    }

    fn evaluate(
        &self,
        observation: &PlantObservation,
        _trace: &InferenceTrace,
    ) -> Option<Advisory> {
        if observation.age_days <= SCHEDULE_CUTOFF_DAYS {
            return None;
        }

        let last = ApplicationStage::SecondTopDressing;

        Some(
            Advisory::new(
                self.id(),
                Severity::Warning,
                "All Application Windows Passed",
                format!(
                    "Plant age ({} days) is past the last top-dressing window (~day {}). \
                     The crop is entering the ripening phase.",
                    observation.age_days,
                    last.target_day()
                ),
            )
            .with_explanation(
                "Split applications are timed to tillering and panicle initiation. \
                 After these stages the crop responds poorly to added nitrogen, so \
                 the application schedule is withheld.",
            )
            .with_data_point("Plant Age", format!("{} days", observation.age_days))
            .with_data_point(
                "Last Window",
                format!("day {} + {}", last.target_day(), last.grace_days()),
            )
            .with_action("Fertilization at this stage is generally not effective."),
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
        ScheduleMissedRule.evaluate(&obs, &trace)
    }

    #[test]
    fn silent_within_schedule() {
        assert!(evaluate(7).is_none());
        assert!(evaluate(50).is_none());
    }

    #[test]
    fn warns_once_schedule_closed() {
        let advisory = evaluate(51).unwrap();
        assert_eq!(advisory.severity, Severity::Warning);
        assert!(evaluate(120).is_some());
    }
}

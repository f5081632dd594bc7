use super::{
    late_season::LateSeasonRule, rainfall_leaching::RainfallLeachingRule,
    schedule_missed::ScheduleMissedRule, Rule,
};
use crate::logic::fuzzy::InferenceTrace;
use crate::models::{Advisory, PlantObservation};

pub struct AdvisoryEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl AdvisoryEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(LateSeasonRule),
            Box::new(ScheduleMissedRule),
            Box::new(RainfallLeachingRule),
        ];

        Self { rules }
    }

    /// All triggered advisories, most severe first.
    pub fn evaluate(
        &self,
        observation: &PlantObservation,
        trace: &InferenceTrace,
    ) -> Vec<Advisory> {
        let mut advisories: Vec<Advisory> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(observation, trace))
            .collect();
        advisories.sort_by(|a, b| b.severity.cmp(&a.severity));
        advisories
    }

    /// Registered rules as (id, name), in evaluation order.
    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for AdvisoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::fuzzy::FuzzyInferenceEngine;
    use crate::models::{Severity, SoilType};

    fn run(age: u32, rainfall: f64) -> Vec<Advisory> {
        let obs = PlantObservation::new(age, 5.0, rainfall, Some(SoilType::Loam));
        let trace = FuzzyInferenceEngine::new().infer_detailed(&obs);
        AdvisoryEngine::new().evaluate(&obs, &trace)
    }

    #[test]
    fn quiet_for_young_crop_in_moderate_rain() {
        assert!(run(20, 150.0).is_empty());
    }

    #[test]
    fn late_crop_in_heavy_rain_raises_all_three_sorted() {
        let advisories = run(95, 450.0);
        let ids: Vec<&str> = advisories.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["late_season", "schedule_missed", "rainfall_leaching"]);
        assert_eq!(advisories[0].severity, Severity::Critical);
    }

    #[test]
    fn lists_registered_rules() {
        let ids: Vec<&str> = AdvisoryEngine::new()
            .list_rules()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["late_season", "schedule_missed", "rainfall_leaching"]);
    }

    #[test]
    fn rule_names_are_distinct_and_non_empty() {
        let rules = AdvisoryEngine::new().list_rules();
        for (_, name) in &rules {
            assert!(!name.is_empty());
        }
        let names: std::collections::HashSet<_> = rules.iter().map(|(_, n)| n).collect();
        assert_eq!(names.len(), rules.len());
    }
}

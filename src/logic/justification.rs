use crate::models::PlantObservation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthPhase {
    EarlyVegetative,
    ActiveVegetative,
    Generative,
}

impl GrowthPhase {
    pub fn from_age(age_days: u32) -> Self {
        if age_days <= 30 {
            GrowthPhase::EarlyVegetative
        } else if age_days <= 60 {
            GrowthPhase::ActiveVegetative
        } else {
            GrowthPhase::Generative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthPhase::EarlyVegetative => "early vegetative",
            GrowthPhase::ActiveVegetative => "active vegetative",
            GrowthPhase::Generative => "generative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafStatus {
    Yellow,
    MediumGreen,
    DarkGreen,
}

impl LeafStatus {
    pub fn from_lcc(leaf_color: f64) -> Self {
        if leaf_color <= 4.0 {
            LeafStatus::Yellow
        } else if leaf_color <= 7.0 {
            LeafStatus::MediumGreen
        } else {
            LeafStatus::DarkGreen
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeafStatus::Yellow => "yellow (deficient)",
            LeafStatus::MediumGreen => "medium green",
            LeafStatus::DarkGreen => "dark green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RainfallStatus {
    Low,
    Moderate,
    High,
}

impl RainfallStatus {
    pub fn from_mm(rainfall_mm: f64) -> Self {
        if rainfall_mm <= 100.0 {
            RainfallStatus::Low
        } else if rainfall_mm <= 200.0 {
            RainfallStatus::Moderate
        } else {
            RainfallStatus::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RainfallStatus::Low => "low",
            RainfallStatus::Moderate => "moderate",
            RainfallStatus::High => "high",
        }
    }
}

pub fn justification(observation: &PlantObservation) -> String {
    let phase = GrowthPhase::from_age(observation.age_days);
    let leaf = LeafStatus::from_lcc(observation.leaf_color);
    let rain = RainfallStatus::from_mm(observation.rainfall_mm);

    format!(
        "Plant age {} days ({} phase), leaf color {} (LCC {:.1}), {} rainfall ({:.0} mm/month) \
         and {} soil. The dosage is adjusted to these conditions.",
        observation.age_days,
        phase.as_str(),
        leaf.as_str(),
        observation.leaf_color,
        rain.as_str(),
        observation.rainfall_mm,
        observation.soil_label().to_lowercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoilType;

    #[test]
    fn growth_phase_boundaries() {
        assert_eq!(GrowthPhase::from_age(0), GrowthPhase::EarlyVegetative);
        assert_eq!(GrowthPhase::from_age(30), GrowthPhase::EarlyVegetative);
        assert_eq!(GrowthPhase::from_age(31), GrowthPhase::ActiveVegetative);
        assert_eq!(GrowthPhase::from_age(60), GrowthPhase::ActiveVegetative);
        assert_eq!(GrowthPhase::from_age(61), GrowthPhase::Generative);
    }

    #[test]
    fn leaf_status_boundaries() {
        assert_eq!(LeafStatus::from_lcc(1.0), LeafStatus::Yellow);
        assert_eq!(LeafStatus::from_lcc(4.0), LeafStatus::Yellow);
        assert_eq!(LeafStatus::from_lcc(4.1), LeafStatus::MediumGreen);
        assert_eq!(LeafStatus::from_lcc(7.0), LeafStatus::MediumGreen);
        assert_eq!(LeafStatus::from_lcc(7.5), LeafStatus::DarkGreen);
    }

    #[test]
    fn rainfall_status_boundaries() {
        assert_eq!(RainfallStatus::from_mm(0.0), RainfallStatus::Low);
        assert_eq!(RainfallStatus::from_mm(100.0), RainfallStatus::Low);
        assert_eq!(RainfallStatus::from_mm(150.0), RainfallStatus::Moderate);
        assert_eq!(RainfallStatus::from_mm(200.0), RainfallStatus::Moderate);
        assert_eq!(RainfallStatus::from_mm(200.5), RainfallStatus::High);
    }

    #[test]
    fn justification_mentions_every_input() {
        let obs = PlantObservation::new(45, 5.0, 150.0, Some(SoilType::Clay));
        let text = justification(&obs);
        assert!(text.contains("45 days"));
        assert!(text.contains("active vegetative"));
        assert!(text.contains("medium green"));
        assert!(text.contains("LCC 5.0"));
        assert!(text.contains("moderate rainfall (150 mm/month)"));
        assert!(text.contains("clay soil"));
    }
}

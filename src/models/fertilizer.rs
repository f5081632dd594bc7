use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStage {
    Basal,
    FirstTopDressing,
    SecondTopDressing,
}

impl ApplicationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStage::Basal => "Basal",
            ApplicationStage::FirstTopDressing => "Top-dressing I",
            ApplicationStage::SecondTopDressing => "Top-dressing II",
        }
    }

    /// Target application day (days after planting)
    pub fn target_day(&self) -> u32 {
        match self {
            ApplicationStage::Basal => 7,
            ApplicationStage::FirstTopDressing => 30,
            ApplicationStage::SecondTopDressing => 45,
        }
    }

    /// Days past the target day before the window counts as missed
    pub fn grace_days(&self) -> u32 {
        match self {
            ApplicationStage::Basal => 3,
            ApplicationStage::FirstTopDressing | ApplicationStage::SecondTopDressing => 5,
        }
    }

    pub fn is_missed(&self, age_days: u32) -> bool {
        age_days > self.target_day() + self.grace_days()
    }
}

impl std::fmt::Display for ApplicationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One split of the total dosage, in whole kg/ha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub stage: ApplicationStage,
    pub day: u32,
    pub nitrogen: u32,
    pub phosphorus: u32,
    pub potassium: u32,
    pub missed: bool,
}

impl ScheduleEntry {
    pub fn dose_label(&self) -> String {
        let parts: Vec<String> = [
            ("N", self.nitrogen),
            ("P", self.phosphorus),
            ("K", self.potassium),
        ]
        .iter()
        .filter(|(_, kg)| *kg > 0)
        .map(|(label, kg)| format!("{}: {}kg", label, kg))
        .collect();

        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Nutrient mass fraction of single-nutrient fertilizer products.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FertilizerContents {
    /// N fraction of urea
    pub urea_n: f64,
    /// P2O5 fraction of SP-36
    pub sp36_p2o5: f64,
    /// K2O fraction of KCl
    pub kcl_k2o: f64,
}

impl Default for FertilizerContents {
    fn default() -> Self {
        Self {
            urea_n: 0.46,
            sp36_p2o5: 0.36,
            kcl_k2o: 0.60,
        }
    }
}

/// Product mass needed to deliver a dosage, kg/ha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductRequirement {
    pub urea: u32,
    pub sp36: u32,
    pub kcl: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_missed_windows() {
        assert!(!ApplicationStage::Basal.is_missed(10));
        assert!(ApplicationStage::Basal.is_missed(11));
        assert!(!ApplicationStage::FirstTopDressing.is_missed(35));
        assert!(ApplicationStage::FirstTopDressing.is_missed(36));
        assert!(!ApplicationStage::SecondTopDressing.is_missed(50));
        assert!(ApplicationStage::SecondTopDressing.is_missed(51));
    }

    #[test]
    fn dose_label_skips_zero_nutrients() {
        let entry = ScheduleEntry {
            stage: ApplicationStage::SecondTopDressing,
            day: 45,
            nitrogen: 26,
            phosphorus: 0,
            potassium: 30,
            missed: false,
        };
        assert_eq!(entry.dose_label(), "N: 26kg, K: 30kg");
    }
}

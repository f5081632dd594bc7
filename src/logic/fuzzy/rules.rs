use super::membership::{AgeCategory, LeafCategory};
use crate::models::NutrientDosage;

pub const HIGH_NPK: NutrientDosage = NutrientDosage::new(120.0, 60.0, 80.0);
pub const MEDIUM_NPK: NutrientDosage = NutrientDosage::new(80.0, 50.0, 60.0);
pub const LOW_N_HIGH_PK: NutrientDosage = NutrientDosage::new(40.0, 70.0, 90.0);
pub const MEDIUM_N_LOW_PK: NutrientDosage = NutrientDosage::new(70.0, 40.0, 40.0);
pub const HIGH_N_MEDIUM_PK: NutrientDosage = NutrientDosage::new(110.0, 55.0, 70.0);

/// A rule fires with strength `min(age degree, leaf degree)` and
/// contributes its output singleton weighted by that strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyRule {
    pub id: &'static str,
    pub age: AgeCategory,
    pub leaf: LeafCategory,
    pub output: NutrientDosage,
}

impl FuzzyRule {
    const fn new(
        id: &'static str,
        age: AgeCategory,
        leaf: LeafCategory,
        output: NutrientDosage,
    ) -> Self {
        Self {
            id,
            age,
            leaf,
            output,
        }
    }
}

pub const RULE_BASE: [FuzzyRule; 9] = [
    FuzzyRule::new("young_yellow", AgeCategory::Young, LeafCategory::Yellow, HIGH_NPK),
    FuzzyRule::new("mature_medium", AgeCategory::Mature, LeafCategory::Medium, MEDIUM_NPK),
    FuzzyRule::new("old_green", AgeCategory::Old, LeafCategory::Green, LOW_N_HIGH_PK),
    FuzzyRule::new("young_medium", AgeCategory::Young, LeafCategory::Medium, HIGH_N_MEDIUM_PK),
    FuzzyRule::new("mature_yellow", AgeCategory::Mature, LeafCategory::Yellow, HIGH_NPK),
    FuzzyRule::new("old_medium", AgeCategory::Old, LeafCategory::Medium, MEDIUM_N_LOW_PK),
    FuzzyRule::new("young_green", AgeCategory::Young, LeafCategory::Green, MEDIUM_NPK),
    FuzzyRule::new("mature_green", AgeCategory::Mature, LeafCategory::Green, MEDIUM_N_LOW_PK),
    FuzzyRule::new("old_yellow", AgeCategory::Old, LeafCategory::Yellow, LOW_N_HIGH_PK),
];

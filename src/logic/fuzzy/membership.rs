//! Membership functions for the linguistic categories of each input.
//!
//! Breakpoints follow the rice LCC fertilization convention. All degrees are
//! clamped to [0, 1]; categories of one variable overlap and need not sum to 1.

use serde::{Deserialize, Serialize};

/// NaN maps to 0 so an undefined input fires no rule.
fn clamp_degree(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeCategory {
    Young,
    Mature,
    Old,
}

impl AgeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeCategory::Young => "young",
            AgeCategory::Mature => "mature",
            AgeCategory::Old => "old",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeafCategory {
    Yellow,
    Medium,
    Green,
}

impl LeafCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeafCategory::Yellow => "yellow",
            LeafCategory::Medium => "medium",
            LeafCategory::Green => "green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeMembership {
    pub young: f64,
    pub mature: f64,
    pub old: f64,
}

impl AgeMembership {
    pub fn degree(&self, category: AgeCategory) -> f64 {
        match category {
            AgeCategory::Young => self.young,
            AgeCategory::Mature => self.mature,
            AgeCategory::Old => self.old,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafMembership {
    pub yellow: f64,
    pub medium: f64,
    pub green: f64,
}

impl LeafMembership {
    pub fn degree(&self, category: LeafCategory) -> f64 {
        match category {
            LeafCategory::Yellow => self.yellow,
            LeafCategory::Medium => self.medium,
            LeafCategory::Green => self.green,
        }
    }
}

/// Only "high" rainfall is modeled. Rainfall adjusts the defuzzified
/// dosage afterwards and never appears in a rule antecedent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainfallMembership {
    pub high: f64,
}

pub fn age_membership(age_days: f64) -> AgeMembership {
    let mature = if age_days <= 30.0 || age_days >= 70.0 {
        0.0
    } else if age_days <= 50.0 {
        (age_days - 30.0) / 20.0
    } else {
        (70.0 - age_days) / 20.0
    };

    AgeMembership {
        young: clamp_degree((40.0 - age_days) / 40.0),
        mature: clamp_degree(mature),
        old: clamp_degree((age_days - 50.0) / 70.0),
    }
}

pub fn leaf_membership(leaf_color: f64) -> LeafMembership {
    let medium = if leaf_color <= 3.0 || leaf_color >= 8.0 {
        0.0
    } else if leaf_color <= 5.5 {
        (leaf_color - 3.0) / 2.5
    } else {
        (8.0 - leaf_color) / 2.5
    };

    LeafMembership {
        yellow: clamp_degree((4.0 - leaf_color) / 3.0),
        medium: clamp_degree(medium),
        green: clamp_degree((leaf_color - 6.0) / 4.0),
    }
}

pub fn rainfall_membership(rainfall_mm: f64) -> RainfallMembership {
    RainfallMembership {
        high: clamp_degree((rainfall_mm - 180.0) / 320.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn in_unit_interval(x: f64) -> bool {
        (0.0..=1.0).contains(&x)
    }

    #[test]
    fn degrees_stay_in_unit_interval() {
        for age in 0..=120 {
            let m = age_membership(age as f64);
            assert!(in_unit_interval(m.young), "young out of range at {}", age);
            assert!(in_unit_interval(m.mature), "mature out of range at {}", age);
            assert!(in_unit_interval(m.old), "old out of range at {}", age);
        }
        for step in 0..=90 {
            let lc = 1.0 + step as f64 * 0.1;
            let m = leaf_membership(lc);
            assert!(in_unit_interval(m.yellow), "yellow out of range at {}", lc);
            assert!(in_unit_interval(m.medium), "medium out of range at {}", lc);
            assert!(in_unit_interval(m.green), "green out of range at {}", lc);
        }
        for rain in (0..=1000).step_by(10) {
            assert!(in_unit_interval(rainfall_membership(rain as f64).high));
        }
    }

    #[test]
    fn nan_input_has_no_membership() {
        let leaf = leaf_membership(f64::NAN);
        assert_eq!((leaf.yellow, leaf.medium, leaf.green), (0.0, 0.0, 0.0));
        assert_eq!(rainfall_membership(f64::NAN).high, 0.0);
        assert_eq!(age_membership(f64::NAN).mature, 0.0);
    }

    #[test]
    fn young_age_boundaries() {
        assert_eq!(age_membership(0.0).young, 1.0);
        assert_abs_diff_eq!(age_membership(20.0).young, 0.5);
        assert_eq!(age_membership(40.0).young, 0.0);
        assert_eq!(age_membership(80.0).young, 0.0);
    }

    #[test]
    fn mature_age_peaks_at_fifty() {
        assert_eq!(age_membership(30.0).mature, 0.0);
        assert_abs_diff_eq!(age_membership(40.0).mature, 0.5);
        assert_eq!(age_membership(50.0).mature, 1.0);
        assert_abs_diff_eq!(age_membership(60.0).mature, 0.5);
        assert_eq!(age_membership(70.0).mature, 0.0);
    }

    #[test]
    fn old_age_ramp() {
        assert_eq!(age_membership(50.0).old, 0.0);
        assert_abs_diff_eq!(age_membership(85.0).old, 0.5);
        assert_eq!(age_membership(120.0).old, 1.0);
        assert_eq!(age_membership(150.0).old, 1.0);
    }

    #[test]
    fn leaf_color_categories() {
        let pale = leaf_membership(1.0);
        assert_eq!(pale.yellow, 1.0);
        assert_eq!(pale.medium, 0.0);
        assert_eq!(pale.green, 0.0);

        let mid = leaf_membership(5.5);
        assert_eq!(mid.yellow, 0.0);
        assert_eq!(mid.medium, 1.0);
        assert_eq!(mid.green, 0.0);

        let dark = leaf_membership(10.0);
        assert_eq!(dark.yellow, 0.0);
        assert_eq!(dark.medium, 0.0);
        assert_eq!(dark.green, 1.0);
    }

    #[test]
    fn leaf_categories_overlap() {
        let m = leaf_membership(3.5);
        assert_abs_diff_eq!(m.yellow, 0.5 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.medium, 0.2, epsilon = 1e-12);

        let m = leaf_membership(7.0);
        assert_abs_diff_eq!(m.medium, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(m.green, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn rainfall_high_ramp() {
        assert_eq!(rainfall_membership(0.0).high, 0.0);
        assert_eq!(rainfall_membership(180.0).high, 0.0);
        assert_abs_diff_eq!(rainfall_membership(340.0).high, 0.5);
        assert_eq!(rainfall_membership(500.0).high, 1.0);
        assert_eq!(rainfall_membership(800.0).high, 1.0);
    }

    #[test]
    fn degree_lookup_matches_fields() {
        let age = age_membership(45.0);
        assert_eq!(age.degree(AgeCategory::Young), age.young);
        assert_eq!(age.degree(AgeCategory::Mature), age.mature);
        assert_eq!(age.degree(AgeCategory::Old), age.old);

        let leaf = leaf_membership(6.5);
        assert_eq!(leaf.degree(LeafCategory::Yellow), leaf.yellow);
        assert_eq!(leaf.degree(LeafCategory::Medium), leaf.medium);
        assert_eq!(leaf.degree(LeafCategory::Green), leaf.green);
    }
}

use serde::{Deserialize, Serialize};

/// Nutrient dosage in kg/ha, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientDosage {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl NutrientDosage {
    pub const fn new(nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.nitrogen * factor,
            self.phosphorus * factor,
            self.potassium * factor,
        )
    }

    /// Nearest whole kg/ha for display. Negative values floor to zero.
    pub fn rounded(&self) -> RoundedDosage {
        RoundedDosage {
            nitrogen: round_kg(self.nitrogen),
            phosphorus: round_kg(self.phosphorus),
            potassium: round_kg(self.potassium),
        }
    }
}

fn round_kg(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundedDosage {
    pub nitrogen: u32,
    pub phosphorus: u32,
    pub potassium: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_uses_nearest_integer() {
        let dosage = NutrientDosage::new(78.28, 48.5, 56.49);
        assert_eq!(
            dosage.rounded(),
            RoundedDosage {
                nitrogen: 78,
                phosphorus: 49,
                potassium: 56,
            }
        );
    }

    #[test]
    fn rounded_floors_negative_and_nan_to_zero() {
        let dosage = NutrientDosage::new(-3.0, f64::NAN, 0.4);
        assert_eq!(dosage.rounded(), RoundedDosage::default());
    }

    #[test]
    fn scaled_multiplies_every_nutrient() {
        let dosage = NutrientDosage::new(80.0, 50.0, 60.0).scaled(0.5);
        assert_eq!(dosage, NutrientDosage::new(40.0, 25.0, 30.0));
    }
}

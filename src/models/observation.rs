use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Loam,
    Clay,
    Sand,
    Organic,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Loam => "Loam",
            SoilType::Clay => "Clay",
            SoilType::Sand => "Sand",
            SoilType::Organic => "Organic",
        }
    }

    /// Accepts the English names and the Indonesian field names
    /// (lempung, liat, pasir, organik).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "loam" | "lempung" => Some(SoilType::Loam),
            "clay" | "liat" => Some(SoilType::Clay),
            "sand" | "sandy" | "pasir" => Some(SoilType::Sand),
            "organic" | "organik" => Some(SoilType::Organic),
            _ => None,
        }
    }

    /// Multiplier applied to every nutrient after defuzzification.
    pub fn retention_factor(&self) -> f64 {
        match self {
            SoilType::Loam => 1.0,
            SoilType::Clay => 0.9,
            SoilType::Sand => 1.2,
            SoilType::Organic => 0.8,
        }
    }

    pub fn all() -> &'static [SoilType] {
        &[
            SoilType::Loam,
            SoilType::Clay,
            SoilType::Sand,
            SoilType::Organic,
        ]
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Retention factor for an optional soil; unrecognized soils are neutral.
pub fn soil_factor(soil_type: Option<SoilType>) -> f64 {
    soil_type.map_or(1.0, |s| s.retention_factor())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafColorSource {
    Manual,
    Image,
}

impl LeafColorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeafColorSource::Manual => "Manual",
            LeafColorSource::Image => "Image",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manual" => Some(LeafColorSource::Manual),
            "image" => Some(LeafColorSource::Image),
            _ => None,
        }
    }
}

impl std::fmt::Display for LeafColorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Crop state used as input to the inference engine.
///
/// Values are not validated here. The formulas are meaningful for
/// `leaf_color` in 1..=10 and non-negative `rainfall_mm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantObservation {
    /// Days after planting
    pub age_days: u32,
    /// Leaf Color Chart index
    pub leaf_color: f64,
    /// Monthly rainfall in mm
    pub rainfall_mm: f64,
    pub soil_type: Option<SoilType>,
}

impl PlantObservation {
    pub fn new(
        age_days: u32,
        leaf_color: f64,
        rainfall_mm: f64,
        soil_type: Option<SoilType>,
    ) -> Self {
        Self {
            age_days,
            leaf_color,
            rainfall_mm,
            soil_type,
        }
    }

    pub fn soil_label(&self) -> &'static str {
        self.soil_type.map_or("Unknown", |s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soil_type_from_str_valid() {
        assert_eq!(SoilType::from_str("loam"), Some(SoilType::Loam));
        assert_eq!(SoilType::from_str("Clay"), Some(SoilType::Clay));
        assert_eq!(SoilType::from_str("SAND"), Some(SoilType::Sand));
        assert_eq!(SoilType::from_str(" organic "), Some(SoilType::Organic));
    }

    #[test]
    fn soil_type_from_str_indonesian_names() {
        assert_eq!(SoilType::from_str("lempung"), Some(SoilType::Loam));
        assert_eq!(SoilType::from_str("liat"), Some(SoilType::Clay));
        assert_eq!(SoilType::from_str("pasir"), Some(SoilType::Sand));
        assert_eq!(SoilType::from_str("organik"), Some(SoilType::Organic));
    }

    #[test]
    fn soil_type_from_str_invalid() {
        assert_eq!(SoilType::from_str("peat"), None);
        assert_eq!(SoilType::from_str(""), None);
    }

    #[test]
    fn soil_type_round_trip() {
        for soil in SoilType::all() {
            let debug_str = format!("{:?}", soil);
            assert_eq!(
                SoilType::from_str(&debug_str),
                Some(*soil),
                "Round-trip failed for {:?}",
                soil
            );
        }
    }

    #[test]
    fn retention_factors() {
        assert_eq!(SoilType::Loam.retention_factor(), 1.0);
        assert_eq!(SoilType::Clay.retention_factor(), 0.9);
        assert_eq!(SoilType::Sand.retention_factor(), 1.2);
        assert_eq!(SoilType::Organic.retention_factor(), 0.8);
    }

    #[test]
    fn unknown_soil_is_neutral() {
        assert_eq!(soil_factor(None), 1.0);
        assert_eq!(soil_factor(SoilType::from_str("volcanic")), 1.0);
        assert_eq!(soil_factor(Some(SoilType::Clay)), 0.9);
    }

    #[test]
    fn leaf_color_source_from_str() {
        assert_eq!(LeafColorSource::from_str("Manual"), Some(LeafColorSource::Manual));
        assert_eq!(LeafColorSource::from_str("image"), Some(LeafColorSource::Image));
        assert_eq!(LeafColorSource::from_str("camera"), None);
    }
}

use super::{LeafColorSource, NutrientDosage, SoilType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved recommendation, as stored in the history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub age_days: u32,
    pub leaf_color: f64,
    pub leaf_source: LeafColorSource,
    pub rainfall_mm: f64,
    pub soil_type: Option<SoilType>,
    pub dosage: NutrientDosage,
    /// Number of advisories raised at the time of recording
    pub advisory_count: u32,
}

impl HistoryEntry {
    pub fn soil_label(&self) -> &'static str {
        self.soil_type.map_or("Unknown", |s| s.as_str())
    }
}

use crate::db::Database;
use crate::error::{Result, RiceFertError};
use crate::logic::FertilizerRecommendation;
use crate::models::{HistoryEntry, LeafColorSource, NutrientDosage, SoilType};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{info, warn};

// Recommendation History Queries

impl Database {
    pub fn record_recommendation(&self, rec: &FertilizerRecommendation) -> Result<i64> {
        let obs = &rec.observation;
        let dosage = &rec.trace.dosage;

        let id = self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO recommendations
                    (created_at, age_days, leaf_color, leaf_source, rainfall_mm, soil_type,
                     nitrogen, phosphorus, potassium, advisories)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    Utc::now().to_rfc3339(),
                    obs.age_days,
                    obs.leaf_color,
                    rec.leaf_source.as_str(),
                    obs.rainfall_mm,
                    obs.soil_type.map(|s| s.as_str()),
                    dosage.nitrogen,
                    dosage.phosphorus,
                    dosage.potassium,
                    rec.advisories.len() as u32,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        info!(id, age_days = obs.age_days, "Recommendation saved to history");
        Ok(id)
    }

    /// Most recent entries first.
    pub fn recent_recommendations(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM recommendations ORDER BY id DESC LIMIT ?1",
            )?;
            let entries = stmt
                .query_map([limit as i64], row_to_history_entry)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
    }

    pub fn get_recommendation(&self, id: i64) -> Result<Option<HistoryEntry>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM recommendations WHERE id = ?1",
                [id],
                row_to_history_entry,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn delete_recommendation(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM recommendations WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(RiceFertError::NotFound(format!("recommendation {}", id)));
            }
            Ok(())
        })
    }

    pub fn count_recommendations(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM recommendations", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}

fn row_to_history_entry(row: &Row) -> rusqlite::Result<HistoryEntry> {
    let created_at_str: String = row.get("created_at")?;
    let leaf_source_str: String = row.get("leaf_source")?;
    let soil_type_str: Option<String> = row.get("soil_type")?;

    let leaf_source = LeafColorSource::from_str(&leaf_source_str).unwrap_or_else(|| {
        warn!(
            leaf_source = %leaf_source_str,
            "Unknown leaf_source in database, defaulting to Manual"
        );
        LeafColorSource::Manual
    });
    let soil_type = soil_type_str.as_ref().and_then(|s| {
        SoilType::from_str(s).or_else(|| {
            warn!(soil_type = %s, "Unknown soil_type in database, treating as unknown soil");
            None
        })
    });

    Ok(HistoryEntry {
        id: Some(row.get("id")?),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        age_days: row.get("age_days")?,
        leaf_color: row.get("leaf_color")?,
        leaf_source,
        rainfall_mm: row.get("rainfall_mm")?,
        soil_type,
        dosage: NutrientDosage::new(
            row.get("nitrogen")?,
            row.get("phosphorus")?,
            row.get("potassium")?,
        ),
        advisory_count: row.get("advisories")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Recommender;
    use crate::models::PlantObservation;

    fn recommendation(age: u32, soil: Option<SoilType>) -> FertilizerRecommendation {
        let obs = PlantObservation::new(age, 4.5, 320.0, soil);
        Recommender::default().recommend(obs, LeafColorSource::Image)
    }

    #[test]
    fn round_trip_through_history() {
        let db = Database::open_in_memory().unwrap();
        let rec = recommendation(95, Some(SoilType::Clay));

        let id = db.record_recommendation(&rec).unwrap();
        let entry = db.get_recommendation(id).unwrap().unwrap();

        assert_eq!(entry.id, Some(id));
        assert_eq!(entry.age_days, 95);
        assert_eq!(entry.leaf_color, 4.5);
        assert_eq!(entry.leaf_source, LeafColorSource::Image);
        assert_eq!(entry.rainfall_mm, 320.0);
        assert_eq!(entry.soil_type, Some(SoilType::Clay));
        assert_eq!(entry.dosage, rec.trace.dosage);
        assert_eq!(entry.advisory_count, rec.advisories.len() as u32);
    }

    #[test]
    fn unknown_soil_round_trips_as_none() {
        let db = Database::open_in_memory().unwrap();
        let id = db.record_recommendation(&recommendation(20, None)).unwrap();
        let entry = db.get_recommendation(id).unwrap().unwrap();
        assert_eq!(entry.soil_type, None);
        assert_eq!(entry.soil_label(), "Unknown");
    }

    #[test]
    fn unrecognized_stored_values_map_to_neutral() {
        let db = Database::open_in_memory().unwrap();
        let id = db.record_recommendation(&recommendation(20, None)).unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE recommendations SET soil_type = 'peat', leaf_source = 'drone' WHERE id = ?1",
                [id],
            )?;
            Ok(())
        })
        .unwrap();

        let entry = db.get_recommendation(id).unwrap().unwrap();
        assert_eq!(entry.soil_type, None);
        assert_eq!(entry.leaf_source, LeafColorSource::Manual);
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let db = Database::open_in_memory().unwrap();
        let first = db.record_recommendation(&recommendation(10, None)).unwrap();
        let second = db.record_recommendation(&recommendation(20, None)).unwrap();
        let third = db.record_recommendation(&recommendation(30, None)).unwrap();

        let recent = db.recent_recommendations(2).unwrap();
        let ids: Vec<i64> = recent.iter().filter_map(|e| e.id).collect();
        assert_eq!(ids, vec![third, second]);
        assert!(!ids.contains(&first));
        assert_eq!(db.count_recommendations().unwrap(), 3);
    }

    #[test]
    fn delete_removes_entry() {
        let db = Database::open_in_memory().unwrap();
        let id = db.record_recommendation(&recommendation(10, None)).unwrap();

        db.delete_recommendation(id).unwrap();
        assert!(db.get_recommendation(id).unwrap().is_none());
        assert_eq!(db.count_recommendations().unwrap(), 0);
        assert!(matches!(
            db.delete_recommendation(id),
            Err(RiceFertError::NotFound(_))
        ));
    }
}

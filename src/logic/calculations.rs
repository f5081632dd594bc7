use crate::models::{
    ApplicationStage, FertilizerContents, ProductRequirement, RoundedDosage, ScheduleEntry,
};

/// Past this age every application window has closed
pub const SCHEDULE_CUTOFF_DAYS: u32 = 50;

/// Past this age fertilization is no longer effective
pub const LATE_SEASON_DAYS: u32 = 90;

/// Convert nutrient dosage to single-nutrient product mass (kg/ha)
pub fn product_requirement(
    dosage: &RoundedDosage,
    contents: &FertilizerContents,
) -> ProductRequirement {
    ProductRequirement {
        urea: product_mass(dosage.nitrogen, contents.urea_n),
        sp36: product_mass(dosage.phosphorus, contents.sp36_p2o5),
        kcl: product_mass(dosage.potassium, contents.kcl_k2o),
    }
}

fn product_mass(nutrient_kg: u32, fraction: f64) -> u32 {
    if fraction <= 0.0 {
        return 0;
    }
    (nutrient_kg as f64 / fraction).round() as u32
}

/// Split total dosage into basal and two top-dressings.
///
/// Nitrogen is split in thirds, all phosphorus goes in at basal and
/// potassium is split between basal and the second top-dressing. Returns
/// `None` once the crop is past the last application window.
pub fn application_schedule(
    dosage: &RoundedDosage,
    age_days: u32,
) -> Option<Vec<ScheduleEntry>> {
    if age_days > SCHEDULE_CUTOFF_DAYS || age_days > LATE_SEASON_DAYS {
        return None;
    }

    let n_total = dosage.nitrogen;
    let k_total = dosage.potassium;

    let n1 = third(n_total);
    let n2 = third(n_total);
    let n3 = n_total.saturating_sub(n1 + n2);
    let k1 = half(k_total);
    let k3 = k_total.saturating_sub(k1);

    let entry = |stage: ApplicationStage, n: u32, p: u32, k: u32| ScheduleEntry {
        stage,
        day: stage.target_day(),
        nitrogen: n,
        phosphorus: p,
        potassium: k,
        missed: stage.is_missed(age_days),
    };

    let mut schedule = vec![entry(ApplicationStage::Basal, n1, dosage.phosphorus, k1)];
    if n2 > 0 {
        schedule.push(entry(ApplicationStage::FirstTopDressing, n2, 0, 0));
    }
    if n3 > 0 || k3 > 0 {
        schedule.push(entry(ApplicationStage::SecondTopDressing, n3, 0, k3));
    }

    Some(schedule)
}

fn third(kg: u32) -> u32 {
    (kg as f64 / 3.0).round() as u32
}

fn half(kg: u32) -> u32 {
    (kg as f64 / 2.0).round() as u32
}

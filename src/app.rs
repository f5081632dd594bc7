use crate::config::Config;
use crate::db::Database;
use crate::error::{Result, RiceFertError};
use crate::logic::{FertilizerRecommendation, LeafColorEstimator, Recommender};
use crate::models::{
    HistoryEntry, LeafColorEstimate, LeafColorSource, NutrientDosage, PixelLayout,
    PlantObservation, SoilType,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rows loaded into the history screen
const HISTORY_LIMIT: usize = 100;

pub const AGE_RANGE: (u32, u32) = (1, 120);
pub const LCC_RANGE: (f64, f64) = (1.0, 10.0);
pub const RAINFALL_RANGE: (f64, f64) = (0.0, 500.0);

const LCC_STEP: f64 = 0.5;
const RAINFALL_STEP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Calculator,
    Results,
    History,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Calculator),
            '2' => Some(Screen::Results),
            '3' => Some(Screen::History),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Age,
    LeafMethod,
    LeafValue,
    Rainfall,
    Soil,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::Age,
            FormField::LeafMethod,
            FormField::LeafValue,
            FormField::Rainfall,
            FormField::Soil,
        ]
    }

    pub fn next(&self) -> Self {
        match self {
            FormField::Age => FormField::LeafMethod,
            FormField::LeafMethod => FormField::LeafValue,
            FormField::LeafValue => FormField::Rainfall,
            FormField::Rainfall => FormField::Soil,
            FormField::Soil => FormField::Age,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Age => FormField::Soil,
            FormField::LeafMethod => FormField::Age,
            FormField::LeafValue => FormField::LeafMethod,
            FormField::Rainfall => FormField::LeafValue,
            FormField::Soil => FormField::Rainfall,
        }
    }

    /// Fields edited as free text; the others cycle through options.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Age | FormField::LeafValue | FormField::Rainfall
        )
    }
}

pub struct FormState {
    pub focused_field: FormField,
    pub editing: bool,
    pub edit_buffer: String,

    pub age_days: u32,
    pub leaf_method: LeafColorSource,
    pub leaf_color: f64,
    pub image_path: String,
    pub rainfall_mm: f64,
    pub soil_type: SoilType,
}

impl FormState {
    pub fn new(rainfall_mm: f64, soil_type: SoilType) -> Self {
        Self {
            focused_field: FormField::Age,
            editing: false,
            edit_buffer: String::new(),
            age_days: 30,
            leaf_method: LeafColorSource::Manual,
            leaf_color: 5.0,
            image_path: String::new(),
            rainfall_mm: rainfall_mm.clamp(RAINFALL_RANGE.0, RAINFALL_RANGE.1),
            soil_type,
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    /// Step the focused value by `direction` (-1 or +1), clamped to its range.
    pub fn adjust(&mut self, direction: i32) {
        match self.focused_field {
            FormField::Age => {
                let age = self.age_days as i64 + direction as i64;
                self.age_days = age.clamp(AGE_RANGE.0 as i64, AGE_RANGE.1 as i64) as u32;
            }
            FormField::LeafMethod => {
                self.leaf_method = match self.leaf_method {
                    LeafColorSource::Manual => LeafColorSource::Image,
                    LeafColorSource::Image => LeafColorSource::Manual,
                };
            }
            FormField::LeafValue => {
                if self.leaf_method == LeafColorSource::Manual {
                    self.leaf_color = clamp_lcc(self.leaf_color + direction as f64 * LCC_STEP);
                }
            }
            FormField::Rainfall => {
                self.rainfall_mm =
                    clamp_rainfall(self.rainfall_mm + direction as f64 * RAINFALL_STEP);
            }
            FormField::Soil => {
                let soils = SoilType::all();
                let current = soils
                    .iter()
                    .position(|s| *s == self.soil_type)
                    .unwrap_or(0) as i32;
                let next = (current + direction).rem_euclid(soils.len() as i32);
                self.soil_type = soils[next as usize];
            }
        }
    }

    pub fn value_text(&self, field: FormField) -> String {
        match field {
            FormField::Age => self.age_days.to_string(),
            FormField::LeafMethod => self.leaf_method.as_str().to_string(),
            FormField::LeafValue => match self.leaf_method {
                LeafColorSource::Manual => format!("{:.1}", self.leaf_color),
                LeafColorSource::Image => self.image_path.clone(),
            },
            FormField::Rainfall => format!("{:.0}", self.rainfall_mm),
            FormField::Soil => self.soil_type.as_str().to_string(),
        }
    }

    /// Enter on a text field starts editing; on an option field it cycles.
    pub fn start_editing(&mut self) {
        if self.focused_field.is_text() {
            self.editing = true;
            self.edit_buffer = self.value_text(self.focused_field);
        } else {
            self.adjust(1);
        }
    }

    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    /// Apply the edit buffer. Unparseable input keeps the previous value.
    pub fn finish_editing(&mut self) -> Result<()> {
        self.editing = false;
        let value = std::mem::take(&mut self.edit_buffer);
        let value = value.trim();

        let invalid = |what: &str| RiceFertError::InvalidData(format!("{}: '{}'", what, value));

        match self.focused_field {
            FormField::Age => {
                let age: u32 = value.parse().map_err(|_| invalid("Invalid age"))?;
                self.age_days = age.clamp(AGE_RANGE.0, AGE_RANGE.1);
            }
            FormField::LeafValue => match self.leaf_method {
                LeafColorSource::Manual => {
                    let lcc: f64 = value.parse().map_err(|_| invalid("Invalid LCC"))?;
                    if !lcc.is_finite() {
                        return Err(invalid("Invalid LCC"));
                    }
                    self.leaf_color = clamp_lcc(lcc);
                }
                LeafColorSource::Image => self.image_path = value.to_string(),
            },
            FormField::Rainfall => {
                let mm: f64 = value.parse().map_err(|_| invalid("Invalid rainfall"))?;
                if !mm.is_finite() {
                    return Err(invalid("Invalid rainfall"));
                }
                self.rainfall_mm = clamp_rainfall(mm);
            }
            FormField::LeafMethod | FormField::Soil => {}
        }
        Ok(())
    }

    pub fn observation(&self) -> PlantObservation {
        PlantObservation::new(
            self.age_days,
            self.leaf_color,
            self.rainfall_mm,
            Some(self.soil_type),
        )
    }
}

fn clamp_lcc(value: f64) -> f64 {
    value.clamp(LCC_RANGE.0, LCC_RANGE.1)
}

fn clamp_rainfall(value: f64) -> f64 {
    value.clamp(RAINFALL_RANGE.0, RAINFALL_RANGE.1)
}

/// Decode a leaf photo (PNG, JPEG or WebP) and estimate its LCC from the RGB pixels.
pub fn analyze_image(estimator: &LeafColorEstimator, path: &Path) -> Result<LeafColorEstimate> {
    let rgb = image::open(path)?.to_rgb8();
    debug!(
        path = %path.display(),
        width = rgb.width(),
        height = rgb.height(),
        "Decoded leaf image"
    );
    estimator.estimate_bytes(rgb.as_raw(), PixelLayout::Rgb)
}

pub struct ResultsState {
    pub scroll: u16,
}

impl ResultsState {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

pub struct HistoryState {
    pub selected_index: usize,
}

impl HistoryState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub db: Database,

    // Data
    pub result: Option<FertilizerRecommendation>,
    pub history: Vec<HistoryEntry>,

    // Screen states
    pub form: FormState,
    pub results_state: ResultsState,
    pub history_state: HistoryState,

    // Services
    pub recommender: Recommender,

    // UI state
    pub status_message: Option<(String, StatusLevel)>,
    pub analyzing: bool,
    pub pending_image: Option<PathBuf>,
}

impl App {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let history = db.recent_recommendations(HISTORY_LIMIT)?;
        let form = FormState::new(
            config.field.default_rainfall_mm,
            config.field.soil().unwrap_or(SoilType::Loam),
        );
        let recommender = Recommender::new(config.fertilizers.contents());

        Ok(Self {
            screen: Screen::Calculator,
            should_quit: false,
            config,
            db,
            result: None,
            history,
            form,
            results_state: ResultsState::new(),
            history_state: HistoryState::new(),
            recommender,
            status_message: None,
            analyzing: false,
            pending_image: None,
        })
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some((message.to_string(), StatusLevel::Info));
    }

    pub fn set_error(&mut self, message: &str) {
        self.status_message = Some((message.to_string(), StatusLevel::Error));
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Live dosage for the current manual inputs.
    pub fn preview(&self) -> Option<NutrientDosage> {
        match self.form.leaf_method {
            LeafColorSource::Manual => Some(self.recommender.preview(&self.form.observation())),
            LeafColorSource::Image => None,
        }
    }

    /// Start a calculation. Manual readings are computed immediately; a
    /// photo is queued for background analysis.
    pub fn request_calculation(&mut self) {
        if self.analyzing {
            return;
        }

        match self.form.leaf_method {
            LeafColorSource::Manual => self.calculate(None),
            LeafColorSource::Image => {
                let path = self.form.image_path.trim();
                if path.is_empty() {
                    self.set_error("Enter an image path first");
                    return;
                }
                self.pending_image = Some(PathBuf::from(path));
                self.analyzing = true;
                self.set_status("Analyzing leaf image...");
            }
        }
    }

    /// Outcome of a background image analysis. The manual LCC in the form is
    /// left untouched; the estimate is always recorded as image-sourced.
    pub fn finish_analysis(&mut self, outcome: Result<LeafColorEstimate>) {
        self.analyzing = false;
        match outcome {
            Ok(estimate) => self.calculate(Some(estimate)),
            Err(e) => self.set_error(&format!("Image analysis failed: {}", e)),
        }
    }

    fn calculate(&mut self, estimate: Option<LeafColorEstimate>) {
        let mut observation = self.form.observation();
        let rec = match estimate {
            Some(estimate) => {
                observation.leaf_color = estimate.score;
                self.recommender
                    .recommend(observation, LeafColorSource::Image)
                    .with_leaf_estimate(estimate)
            }
            None => self.recommender.recommend(observation, LeafColorSource::Manual),
        };

        match self.db.record_recommendation(&rec) {
            Ok(_) => {
                self.set_status("Recommendation saved to history");
                if let Err(e) = self.reload_history() {
                    warn!("Failed to reload history: {}", e);
                }
            }
            Err(e) => {
                warn!("Failed to save recommendation: {}", e);
                self.set_error(&format!("Save failed: {}", e));
            }
        }

        self.result = Some(rec);
        self.results_state = ResultsState::new();
        self.switch_screen(Screen::Results);
    }

    pub fn reload_history(&mut self) -> Result<()> {
        self.history = self.db.recent_recommendations(HISTORY_LIMIT)?;
        if self.history_state.selected_index >= self.history.len() {
            self.history_state.selected_index = self.history.len().saturating_sub(1);
        }
        Ok(())
    }

    pub fn delete_selected_history(&mut self) -> Result<()> {
        let id = self.selected_history().and_then(|entry| entry.id);

        if let Some(id) = id {
            self.db.delete_recommendation(id)?;
            self.reload_history()?;
            self.set_status("History entry deleted");
        }
        Ok(())
    }

    pub fn selected_history(&self) -> Option<&HistoryEntry> {
        self.history.get(self.history_state.selected_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Config::default(), Database::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn form_defaults_come_from_config() {
        let app = app();
        assert_eq!(app.form.rainfall_mm, 150.0);
        assert_eq!(app.form.soil_type, SoilType::Loam);
        assert_eq!(app.screen, Screen::Calculator);
    }

    #[test]
    fn adjust_clamps_to_slider_ranges() {
        let mut form = FormState::new(495.0, SoilType::Loam);

        form.focused_field = FormField::Age;
        form.age_days = 1;
        form.adjust(-1);
        assert_eq!(form.age_days, 1);

        form.focused_field = FormField::Rainfall;
        form.adjust(1);
        assert_eq!(form.rainfall_mm, 500.0);

        form.focused_field = FormField::LeafValue;
        form.leaf_color = 9.8;
        form.adjust(1);
        assert_eq!(form.leaf_color, 10.0);
    }

    #[test]
    fn soil_cycles_both_ways() {
        let mut form = FormState::new(150.0, SoilType::Loam);
        form.focused_field = FormField::Soil;
        form.adjust(-1);
        assert_eq!(form.soil_type, SoilType::Organic);
        form.adjust(1);
        assert_eq!(form.soil_type, SoilType::Loam);
    }

    #[test]
    fn editing_parses_and_clamps() {
        let mut form = FormState::new(150.0, SoilType::Loam);
        form.focused_field = FormField::Age;
        form.start_editing();
        assert!(form.editing);
        form.edit_buffer = "400".into();
        form.finish_editing().unwrap();
        assert_eq!(form.age_days, 120);

        form.focused_field = FormField::Rainfall;
        form.start_editing();
        form.edit_buffer = "wet".into();
        assert!(form.finish_editing().is_err());
        assert_eq!(form.rainfall_mm, 150.0);
        assert!(!form.editing);
    }

    #[test]
    fn enter_on_option_field_cycles() {
        let mut form = FormState::new(150.0, SoilType::Loam);
        form.focused_field = FormField::LeafMethod;
        form.start_editing();
        assert!(!form.editing);
        assert_eq!(form.leaf_method, LeafColorSource::Image);
    }

    #[test]
    fn manual_calculation_records_history() {
        let mut app = app();
        app.request_calculation();

        assert_eq!(app.screen, Screen::Results);
        assert!(app.result.is_some());
        assert_eq!(app.history.len(), 1);
        assert!(app.preview().is_some());

        app.delete_selected_history().unwrap();
        assert!(app.history.is_empty());
    }

    #[test]
    fn image_calculation_requires_path_then_queues() {
        let mut app = app();
        app.form.leaf_method = LeafColorSource::Image;

        app.request_calculation();
        assert!(app.pending_image.is_none());
        assert!(matches!(app.status_message, Some((_, StatusLevel::Error))));

        app.form.image_path = "leaf.jpg".into();
        app.request_calculation();
        assert_eq!(app.pending_image, Some(PathBuf::from("leaf.jpg")));
        assert!(app.analyzing);
        assert!(app.preview().is_none());
    }

    #[test]
    fn failed_analysis_reports_error_and_stays() {
        let mut app = app();
        app.analyzing = true;
        app.finish_analysis(Err(RiceFertError::InsufficientLeafArea {
            leaf_pixels: 3,
            minimum: 100,
        }));
        assert!(!app.analyzing);
        assert_eq!(app.screen, Screen::Calculator);
        assert!(app.history.is_empty());
    }

    #[test]
    fn successful_analysis_uses_estimated_score() {
        let mut app = app();
        app.form.leaf_method = LeafColorSource::Image;
        app.finish_analysis(Ok(LeafColorEstimate {
            score: 7.25,
            mean_hue: 115.0,
            leaf_pixels: 200,
            total_pixels: 200,
        }));

        let result = app.result.as_ref().unwrap();
        assert_eq!(result.observation.leaf_color, 7.25);
        assert_eq!(result.leaf_source, LeafColorSource::Image);
        assert!(result.leaf_estimate.is_some());
        assert_eq!(app.history[0].leaf_source, LeafColorSource::Image);
        assert_eq!(app.form.leaf_color, 5.0);
    }

    #[test]
    fn switching_to_manual_mid_analysis_keeps_both_values() {
        let mut app = app();
        app.form.leaf_method = LeafColorSource::Image;
        app.form.image_path = "leaf.jpg".into();
        app.request_calculation();
        assert!(app.analyzing);

        app.form.leaf_method = LeafColorSource::Manual;
        app.form.leaf_color = 3.5;
        app.finish_analysis(Ok(LeafColorEstimate {
            score: 8.75,
            mean_hue: 125.0,
            leaf_pixels: 400,
            total_pixels: 500,
        }));

        let result = app.result.as_ref().unwrap();
        assert_eq!(result.leaf_source, LeafColorSource::Image);
        assert_eq!(result.observation.leaf_color, 8.75);
        assert_eq!(app.history[0].leaf_source, LeafColorSource::Image);
        assert_eq!(app.history[0].leaf_color, 8.75);

        // The manual reading survives for the next calculation
        assert_eq!(app.form.leaf_color, 3.5);
        assert_eq!(app.preview(), Some(app.recommender.preview(&app.form.observation())));
    }

    #[test]
    fn selected_history_follows_selection() {
        let mut app = app();
        app.request_calculation();
        app.form.age_days = 60;
        app.request_calculation();

        assert_eq!(app.selected_history().map(|e| e.age_days), Some(60));
        app.history_state.next(app.history.len());
        assert_eq!(app.selected_history().map(|e| e.age_days), Some(30));

        app.delete_selected_history().unwrap();
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.selected_history().map(|e| e.age_days), Some(60));
    }

    fn leaf_png(name: &str) -> PathBuf {
        // 15 of every 20 columns are leaf green, HSV(115, 0.5, 0.75)
        let img = image::RgbImage::from_fn(20, 10, |x, _| {
            if x < 15 {
                image::Rgb([104, 192, 96])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        let path = std::env::temp_dir()
            .join(format!("ricefert-{}-{}.png", name, std::process::id()));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn analyze_image_decodes_png_from_disk() {
        let path = leaf_png("analyze");
        let estimate = analyze_image(&LeafColorEstimator::new(), &path);
        let _ = std::fs::remove_file(&path);

        let estimate = estimate.unwrap();
        assert_eq!(estimate.total_pixels, 200);
        assert_eq!(estimate.leaf_pixels, 150);
        assert!((estimate.score - 7.25).abs() < 1e-9);
    }

    #[test]
    fn analyze_image_reports_missing_file() {
        let err = analyze_image(&LeafColorEstimator::new(), Path::new("/nonexistent/leaf.png"))
            .unwrap_err();
        assert!(matches!(err, RiceFertError::Image(_)));
    }
}

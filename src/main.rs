mod app;
mod cli;
mod config;
mod db;
mod error;
mod logic;
mod models;
mod ui;

use anyhow::Context;
use app::{analyze_image, App, Screen};
use clap::Parser;
use cli::{Cli, Commands, RecommendArgs};
use config::Config;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use db::Database;
use error::RiceFertError;
use logic::advisories::AdvisoryEngine;
use logic::fuzzy::FuzzyInferenceEngine;
use logic::{FertilizerRecommendation, LeafColorEstimator, Recommender};
use models::{HistoryEntry, LeafColorEstimate, LeafColorSource, PlantObservation, SoilType};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use ui::screens::{CalculatorScreen, HistoryScreen, ResultsScreen};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Some(Commands::Init) => {
            Config::setup_interactive()?;
            Ok(())
        }
        Some(Commands::Check) => {
            let (config, db_path) = load_environment(&cli)?;
            run_check(&cli, &config, &db_path)
        }
        Some(Commands::Recommend(args)) => {
            let (config, db_path) = load_environment(&cli)?;
            run_recommend(args, &config, &db_path)
        }
        Some(Commands::Lcc { path }) => {
            let (config, _) = load_environment(&cli)?;
            run_lcc(path, &config)
        }
        Some(Commands::History { limit, id }) => {
            let (_, db_path) = load_environment(&cli)?;
            match id {
                Some(id) => run_history_entry(*id, &db_path),
                None => run_history(*limit, &db_path),
            }
        }
        None => {
            let (config, db_path) = load_environment(&cli)?;
            let db = open_database(&db_path)?;
            run_tui(config, db).await
        }
    }
}

fn load_environment(cli: &Cli) -> anyhow::Result<(Config, PathBuf)> {
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let db_path = Config::db_path(cli.data_dir.as_ref())?;
    Ok((config, db_path))
}

fn open_database(db_path: &Path) -> anyhow::Result<Database> {
    Database::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

fn run_check(cli: &Cli, config: &Config, db_path: &Path) -> anyhow::Result<()> {
    let config_path = match &cli.config {
        Some(p) => p.clone(),
        None => Config::find_config_path()?,
    };
    if config_path.exists() {
        println!("Config:     {} (OK)", config_path.display());
    } else {
        println!("Config:     not found, using defaults");
    }
    println!(
        "Field:      {} ({} soil, {:.0} mm/month default rainfall)",
        config.field.name,
        config.field.soil().map_or("unknown", |s| s.as_str()),
        config.field.default_rainfall_mm
    );
    println!(
        "Products:   urea {:.2} N, SP-36 {:.2} P2O5, KCl {:.2} K2O",
        config.fertilizers.urea_n, config.fertilizers.sp36_p2o5, config.fertilizers.kcl_k2o
    );

    let db = open_database(db_path)?;
    println!(
        "Database:   {} (OK, {} saved recommendations)",
        db.path().display(),
        db.count_recommendations()?
    );

    println!();
    println!("Fuzzy rules:");
    for (id, output) in FuzzyInferenceEngine::new().list_rules() {
        println!(
            "  {:<14} N {:>3.0}  P {:>3.0}  K {:>3.0}",
            id, output.nitrogen, output.phosphorus, output.potassium
        );
    }
    println!("Advisory rules:");
    for (id, name) in AdvisoryEngine::new().list_rules() {
        println!("  {:<18} {}", id, name);
    }

    Ok(())
}

fn run_recommend(args: &RecommendArgs, config: &Config, db_path: &Path) -> anyhow::Result<()> {
    args.validate()?;

    let rainfall_mm = args.rainfall.unwrap_or(config.field.default_rainfall_mm);
    let soil_type = match &args.soil {
        Some(name) => SoilType::from_str(name).or_else(|| {
            warn!(soil_type = %name, "Unknown soil type, using neutral factor");
            None
        }),
        None => config.field.soil(),
    };

    let (leaf_color, leaf_source, estimate) = match (args.lcc, &args.image) {
        (Some(lcc), _) => (lcc, LeafColorSource::Manual, None),
        (None, Some(path)) => {
            let estimate = analyze_image(&estimator(config), path)
                .with_context(|| format!("Failed to analyze {}", path.display()))?;
            (estimate.score, LeafColorSource::Image, Some(estimate))
        }
        (None, None) => {
            let err = RiceFertError::InvalidData("either --lcc or --image is required".into());
            return Err(err.into());
        }
    };

    let observation = PlantObservation::new(args.age, leaf_color, rainfall_mm, soil_type);
    let recommender = Recommender::new(config.fertilizers.contents());
    let mut rec = recommender.recommend(observation, leaf_source);
    if let Some(estimate) = estimate {
        rec = rec.with_leaf_estimate(estimate);
    }

    if !args.no_save {
        let db = open_database(db_path)?;
        db.record_recommendation(&rec)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rec)?);
    } else {
        print_recommendation(&rec);
    }

    Ok(())
}

fn run_lcc(path: &Path, config: &Config) -> anyhow::Result<()> {
    let estimate = analyze_image(&estimator(config), path)
        .with_context(|| format!("Failed to analyze {}", path.display()))?;
    print_estimate(&estimate);
    Ok(())
}

fn run_history(limit: usize, db_path: &Path) -> anyhow::Result<()> {
    let db = open_database(db_path)?;
    let entries = db.recent_recommendations(limit)?;

    if entries.is_empty() {
        println!("No saved recommendations.");
        return Ok(());
    }

    println!(
        "{:>5}  {:<16}  {:>4}  {:>5}  {:<6}  {:>7}  {:<8}  {:>4} {:>4} {:>4}",
        "ID", "Saved", "Age", "LCC", "Source", "Rain", "Soil", "N", "P", "K"
    );
    for entry in &entries {
        let rounded = entry.dosage.rounded();
        println!(
            "{:>5}  {:<16}  {:>4}  {:>5.1}  {:<6}  {:>7.0}  {:<8}  {:>4} {:>4} {:>4}",
            entry.id.unwrap_or_default(),
            entry
                .created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            entry.age_days,
            entry.leaf_color,
            entry.leaf_source.as_str(),
            entry.rainfall_mm,
            entry.soil_label(),
            rounded.nitrogen,
            rounded.phosphorus,
            rounded.potassium,
        );
    }

    Ok(())
}

fn run_history_entry(id: i64, db_path: &Path) -> anyhow::Result<()> {
    let db = open_database(db_path)?;
    let entry = db
        .get_recommendation(id)?
        .ok_or_else(|| RiceFertError::NotFound(format!("recommendation {}", id)))?;
    print_history_entry(&entry);
    Ok(())
}

fn print_history_entry(entry: &HistoryEntry) {
    let rounded = entry.dosage.rounded();
    println!(
        "Saved:       {}",
        entry
            .created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    );
    println!("Plant age:   {} days", entry.age_days);
    println!(
        "Leaf color:  LCC {:.2} ({})",
        entry.leaf_color,
        entry.leaf_source.as_str().to_lowercase()
    );
    println!("Rainfall:    {:.0} mm/month", entry.rainfall_mm);
    println!("Soil:        {}", entry.soil_label());
    println!(
        "Dosage:      N {}  P {}  K {} kg/ha",
        rounded.nitrogen, rounded.phosphorus, rounded.potassium
    );
    println!("Advisories:  {}", entry.advisory_count);
}

fn estimator(config: &Config) -> LeafColorEstimator {
    LeafColorEstimator::with_parallel_threshold(config.analysis.parallel_threshold)
}

fn print_estimate(estimate: &LeafColorEstimate) {
    println!("LCC score:    {:.2}", estimate.score);
    println!("Mean hue:     {:.1}°", estimate.mean_hue);
    println!(
        "Leaf pixels:  {} of {} ({:.1}%)",
        estimate.leaf_pixels,
        estimate.total_pixels,
        estimate.leaf_fraction() * 100.0
    );
}

fn print_recommendation(rec: &FertilizerRecommendation) {
    let obs = &rec.observation;

    if let Some(estimate) = &rec.leaf_estimate {
        print_estimate(estimate);
        println!();
    }

    println!(
        "Plant age {} days, LCC {:.2} ({}), rainfall {:.0} mm/month, {} soil",
        obs.age_days,
        obs.leaf_color,
        rec.leaf_source.as_str().to_lowercase(),
        obs.rainfall_mm,
        obs.soil_label().to_lowercase()
    );
    println!();
    println!("Recommended dosage (kg/ha)");
    println!("  N: {:>4}", rec.dosage.nitrogen);
    println!("  P: {:>4}", rec.dosage.phosphorus);
    println!("  K: {:>4}", rec.dosage.potassium);
    println!();

    println!("Application schedule");
    match &rec.schedule {
        Some(schedule) => {
            for entry in schedule {
                println!(
                    "  {:<16} day {:>2}  {}{}",
                    entry.stage.as_str(),
                    entry.day,
                    entry.dose_label(),
                    if entry.missed { "  (missed)" } else { "" }
                );
            }
        }
        None => println!("  Withheld: all application windows have passed"),
    }
    println!();

    println!("Fertilizer products (kg/ha)");
    println!("  Urea:  {:>4}", rec.products.urea);
    println!("  SP-36: {:>4}", rec.products.sp36);
    println!("  KCl:   {:>4}", rec.products.kcl);
    println!();

    println!("{}", rec.justification);

    if !rec.advisories.is_empty() {
        println!();
        println!("Advisories");
        for advisory in &rec.advisories {
            println!(
                "  [{}] {}: {}",
                advisory.severity.as_str(),
                advisory.title,
                advisory.description
            );
            if let Some(action) = &advisory.suggested_action {
                println!("      {}", action);
            }
        }
    }
}

async fn run_tui(config: Config, db: Database) -> anyhow::Result<()> {
    let mut app = App::new(config, db)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(terminal: &mut Tui, app: &mut App) -> anyhow::Result<()> {
    let mut analysis: Option<JoinHandle<error::Result<LeafColorEstimate>>> = None;

    loop {
        terminal.draw(|f| draw(f, app))?;

        // Poll with a timeout so background analysis results get picked up
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if let Some(path) = app.pending_image.take() {
            let leaf_estimator = estimator(&app.config);
            analysis = Some(tokio::task::spawn_blocking(move || {
                analyze_image(&leaf_estimator, &path)
            }));
        }

        if analysis.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = analysis.take() {
                let outcome = handle.await.unwrap_or_else(|e| {
                    Err(RiceFertError::InvalidData(format!(
                        "analysis task failed: {}",
                        e
                    )))
                });
                app.finish_analysis(outcome);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let status = app
        .status_message
        .as_ref()
        .map(|(msg, level)| (msg.as_str(), *level));

    match app.screen {
        Screen::Calculator => {
            let screen = CalculatorScreen::new(&app.form, &app.config.field.name)
                .with_preview(app.preview())
                .analyzing(app.analyzing)
                .with_status(status);
            f.render_widget(screen, area);
        }
        Screen::Results => {
            let screen = ResultsScreen::new(app.result.as_ref())
                .with_scroll(app.results_state.scroll)
                .with_status(status);
            f.render_widget(screen, area);
        }
        Screen::History => {
            let screen = HistoryScreen::new(&app.history)
                .with_selection(app.history_state.selected_index)
                .with_status(status);
            f.render_widget(screen, area);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // Text entry swallows every other key
    if app.form.editing {
        handle_editing_input(app, key.code);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => {
            app.clear_status();
            app.switch_screen(Screen::Calculator);
        }
        KeyCode::Char(c) => {
            if let Some(screen) = Screen::from_key(c) {
                app.switch_screen(screen);
            } else {
                handle_screen_input(app, key.code);
            }
        }
        _ => handle_screen_input(app, key.code),
    }
}

fn handle_screen_input(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::Calculator => handle_calculator_input(app, code),
        Screen::Results => handle_results_input(app, code),
        Screen::History => handle_history_input(app, code),
    }
}

fn handle_calculator_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up => app.form.prev_field(),
        KeyCode::Down | KeyCode::Tab => app.form.next_field(),
        KeyCode::Left => app.form.adjust(-1),
        KeyCode::Right => app.form.adjust(1),
        KeyCode::Enter => app.form.start_editing(),
        KeyCode::Char('c') => {
            app.clear_status();
            app.request_calculation();
        }
        _ => {}
    }
}

fn handle_editing_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.form.cancel_editing(),
        KeyCode::Enter => {
            match app.form.finish_editing() {
                Ok(()) => app.clear_status(),
                Err(e) => app.set_error(&e.to_string()),
            }
        }
        KeyCode::Backspace => {
            app.form.edit_buffer.pop();
        }
        KeyCode::Char(c) => app.form.edit_buffer.push(c),
        _ => {}
    }
}

fn handle_results_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up => app.results_state.scroll_up(),
        KeyCode::Down => app.results_state.scroll_down(),
        _ => {}
    }
}

fn handle_history_input(app: &mut App, code: KeyCode) {
    let count = app.history.len();
    match code {
        KeyCode::Up => app.history_state.prev(),
        KeyCode::Down => app.history_state.next(count),
        KeyCode::Char('d') => {
            if let Err(e) = app.delete_selected_history() {
                app.set_error(&format!("Delete failed: {}", e));
            }
        }
        _ => {}
    }
}

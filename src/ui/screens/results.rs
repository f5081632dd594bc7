use crate::app::StatusLevel;
use crate::logic::FertilizerRecommendation;
use crate::models::LeafColorSource;
use crate::ui::components::{lcc_gauge, nutrient_gauge, Nutrient};
use crate::ui::{render_status, Theme};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct ResultsScreen<'a> {
    pub result: Option<&'a FertilizerRecommendation>,
    pub scroll: u16,
    pub status: Option<(&'a str, StatusLevel)>,
}

impl<'a> ResultsScreen<'a> {
    pub fn new(result: Option<&'a FertilizerRecommendation>) -> Self {
        Self {
            result,
            scroll: 0,
            status: None,
        }
    }

    pub fn with_scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_status(mut self, status: Option<(&'a str, StatusLevel)>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for ResultsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(4), // Gauges row
                Constraint::Min(10),   // Details
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Recommendation", Theme::title()),
            Span::styled(" - NPK dosage per hectare", Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        match self.result {
            Some(rec) => {
                self.render_gauges(rec, chunks[1], buf);

                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(chunks[2]);

                self.render_details(rec, body[0], buf);
                render_advisories(rec, body[1], buf);
            }
            None => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border());
                let inner = block.inner(chunks[2]);
                block.render(chunks[2], buf);
                Paragraph::new(Span::styled(
                    "No recommendation yet. Fill in the calculator and press [c].",
                    Theme::dim(),
                ))
                .render(inner, buf);
            }
        }

        render_status(self.status, chunks[3], buf);

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Scroll ", Theme::nav_label()),
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Calculator ", Theme::nav_label()),
            Span::styled("[3]", Theme::nav_key()),
            Span::styled("History ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl ResultsScreen<'_> {
    fn render_gauges(&self, rec: &FertilizerRecommendation, area: Rect, buf: &mut Buffer) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        let dosage = rec.dosage;
        nutrient_gauge(Nutrient::Nitrogen, Some(dosage.nitrogen as f64)).render(cols[0], buf);
        nutrient_gauge(Nutrient::Phosphorus, Some(dosage.phosphorus as f64)).render(cols[1], buf);
        nutrient_gauge(Nutrient::Potassium, Some(dosage.potassium as f64)).render(cols[2], buf);

        let lcc_title = match rec.leaf_source {
            LeafColorSource::Manual => "Leaf Color (manual)",
            LeafColorSource::Image => "Leaf Color (image)",
        };
        lcc_gauge(lcc_title, Some(rec.observation.leaf_color)).render(cols[3], buf);
    }

    fn render_details(&self, rec: &FertilizerRecommendation, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let obs = &rec.observation;
        let trace = &rec.trace;
        let mut lines = Vec::new();

        lines.push(Line::from(Span::styled("Inputs", Theme::header())));
        lines.push(label_value("  Plant age", format!("{} days", obs.age_days)));
        lines.push(label_value("  Leaf color", format!("LCC {:.2}", obs.leaf_color)));
        if let Some(estimate) = &rec.leaf_estimate {
            lines.push(label_value(
                "  Leaf pixels",
                format!(
                    "{} of {} ({:.0}%), mean hue {:.1}°",
                    estimate.leaf_pixels,
                    estimate.total_pixels,
                    estimate.leaf_fraction() * 100.0,
                    estimate.mean_hue
                ),
            ));
        }
        lines.push(label_value("  Rainfall", format!("{:.0} mm/month", obs.rainfall_mm)));
        lines.push(label_value(
            "  Soil",
            format!("{} (x{:.1})", obs.soil_label(), trace.soil_factor),
        ));
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled("Fuzzy Inference", Theme::header())));
        lines.push(label_value(
            "  Age",
            format!(
                "young {:.2}  mature {:.2}  old {:.2}",
                trace.age.young, trace.age.mature, trace.age.old
            ),
        ));
        lines.push(label_value(
            "  Leaf",
            format!(
                "yellow {:.2}  medium {:.2}  green {:.2}",
                trace.leaf.yellow, trace.leaf.medium, trace.leaf.green
            ),
        ));
        lines.push(label_value("  Rainfall", format!("high {:.2}", trace.rainfall.high)));
        match trace.dominant_rule() {
            Some(rule) => lines.push(label_value(
                "  Dominant rule",
                format!(
                    "{} ({:.2} of {:.2} total strength)",
                    rule.rule_id,
                    rule.strength,
                    trace.total_strength()
                ),
            )),
            None => lines.push(Line::from(Span::styled(
                "  No rule fired, medium NPK fallback used",
                Theme::warning(),
            ))),
        }
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled("Application Schedule", Theme::header())));
        match &rec.schedule {
            Some(schedule) => {
                for entry in schedule {
                    let style = if entry.missed {
                        Theme::dim()
                    } else {
                        Theme::normal()
                    };
                    let mut spans = vec![Span::styled(
                        format!(
                            "  {:<16} day {:>2}  {}",
                            entry.stage.as_str(),
                            entry.day,
                            entry.dose_label()
                        ),
                        style,
                    )];
                    if entry.missed {
                        spans.push(Span::styled("  (missed)", Theme::warning()));
                    }
                    lines.push(Line::from(spans));
                }
            }
            None => lines.push(Line::from(Span::styled(
                "  Withheld: all application windows have passed",
                Theme::warning(),
            ))),
        }
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled("Fertilizer Products", Theme::header())));
        lines.push(label_value("  Urea", format!("{} kg/ha", rec.products.urea)));
        lines.push(label_value("  SP-36", format!("{} kg/ha", rec.products.sp36)));
        lines.push(label_value("  KCl", format!("{} kg/ha", rec.products.kcl)));
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled("Justification", Theme::header())));
        lines.push(Line::from(Span::styled(
            rec.justification.clone(),
            Theme::normal(),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(inner, buf);
    }
}

fn label_value(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Theme::dim()),
        Span::styled(value, Theme::highlight()),
    ])
}

fn render_advisories(rec: &FertilizerRecommendation, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(format!("Advisories ({})", rec.advisories.len()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    block.render(area, buf);

    if rec.advisories.is_empty() {
        Paragraph::new(Span::styled("No advisories", Theme::success())).render(inner, buf);
        return;
    }

    let mut lines = Vec::new();
    for advisory in &rec.advisories {
        let severity_style = Style::default().fg(advisory.severity.color());
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", advisory.severity.symbol()), severity_style),
            Span::styled(advisory.title.as_str(), Theme::header()),
        ]));
        lines.push(Line::from(Span::styled(
            advisory.description.as_str(),
            Theme::normal(),
        )));
        for dp in &advisory.data_points {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", dp.label), Theme::dim()),
                Span::styled(dp.value.as_str(), Theme::highlight()),
            ]));
        }
        if let Some(action) = &advisory.suggested_action {
            lines.push(Line::from(Span::styled(action.as_str(), Theme::success())));
        }
        lines.push(Line::from(""));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}

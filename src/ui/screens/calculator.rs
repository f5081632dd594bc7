use crate::app::{FormField, FormState, StatusLevel, AGE_RANGE, LCC_RANGE, RAINFALL_RANGE};
use crate::models::{LeafColorSource, NutrientDosage, SoilType};
use crate::ui::components::{nutrient_gauge, InputWidget, Nutrient, SelectWidget};
use crate::ui::{render_status, Theme};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

const METHOD_OPTIONS: &[&str] = &["Manual", "Image"];

pub struct CalculatorScreen<'a> {
    pub form: &'a FormState,
    pub field_name: &'a str,
    pub preview: Option<NutrientDosage>,
    pub analyzing: bool,
    pub status: Option<(&'a str, StatusLevel)>,
}

impl<'a> CalculatorScreen<'a> {
    pub fn new(form: &'a FormState, field_name: &'a str) -> Self {
        Self {
            form,
            field_name,
            preview: None,
            analyzing: false,
            status: None,
        }
    }

    pub fn with_preview(mut self, preview: Option<NutrientDosage>) -> Self {
        self.preview = preview;
        self
    }

    pub fn analyzing(mut self, analyzing: bool) -> Self {
        self.analyzing = analyzing;
        self
    }

    pub fn with_status(mut self, status: Option<(&'a str, StatusLevel)>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for CalculatorScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(17),   // Form (5 fields * 3 lines + borders)
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Fertilizer Calculator", Theme::title()),
            Span::styled(format!(" - {}", self.field_name), Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        self.render_form(content[0], buf);
        self.render_side(content[1], buf);

        render_status(self.status, chunks[2], buf);

        let nav = if self.form.editing {
            Line::from(vec![
                Span::styled("[Enter]", Theme::nav_key()),
                Span::styled("Apply ", Theme::nav_label()),
                Span::styled("[Esc]", Theme::nav_key()),
                Span::styled("Cancel", Theme::nav_label()),
            ])
        } else {
            Line::from(vec![
                Span::styled("[↑↓]", Theme::nav_key()),
                Span::styled("Field ", Theme::nav_label()),
                Span::styled("[←→]", Theme::nav_key()),
                Span::styled("Adjust ", Theme::nav_label()),
                Span::styled("[Enter]", Theme::nav_key()),
                Span::styled("Edit ", Theme::nav_label()),
                Span::styled("[c]", Theme::nav_key()),
                Span::styled("Calculate ", Theme::nav_label()),
                Span::styled("[2]", Theme::nav_key()),
                Span::styled("Results ", Theme::nav_label()),
                Span::styled("[3]", Theme::nav_key()),
                Span::styled("History ", Theme::nav_label()),
                Span::styled("[q]", Theme::nav_key()),
                Span::styled("Quit", Theme::nav_label()),
            ])
        };
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

impl CalculatorScreen<'_> {
    fn render_form(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Plant Conditions")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let constraints: Vec<Constraint> = FormField::all()
            .iter()
            .map(|_| Constraint::Length(3))
            .collect();

        let field_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let soil_names: Vec<&str> = SoilType::all().iter().map(|s| s.as_str()).collect();

        for (i, field) in FormField::all().iter().enumerate() {
            let focused = *field == self.form.focused_field;
            let editing = focused && self.form.editing;
            let value = if editing {
                self.form.edit_buffer.clone()
            } else {
                self.form.value_text(*field)
            };

            match field {
                FormField::Age => InputWidget::new("Plant Age (days after planting)", &value)
                    .unit(" days")
                    .focused(focused)
                    .editing(editing)
                    .render(field_areas[i], buf),
                FormField::LeafMethod => {
                    let selected = match self.form.leaf_method {
                        LeafColorSource::Manual => 0,
                        LeafColorSource::Image => 1,
                    };
                    SelectWidget::new("LCC Method", METHOD_OPTIONS, selected)
                        .focused(focused)
                        .render(field_areas[i], buf)
                }
                FormField::LeafValue => {
                    let label = match self.form.leaf_method {
                        LeafColorSource::Manual => "Leaf Color (LCC 1-10)",
                        LeafColorSource::Image => "Leaf Image Path",
                    };
                    InputWidget::new(label, &value)
                        .focused(focused)
                        .editing(editing)
                        .render(field_areas[i], buf)
                }
                FormField::Rainfall => InputWidget::new("Monthly Rainfall", &value)
                    .unit(" mm")
                    .focused(focused)
                    .editing(editing)
                    .render(field_areas[i], buf),
                FormField::Soil => {
                    let selected = SoilType::all()
                        .iter()
                        .position(|s| *s == self.form.soil_type)
                        .unwrap_or(0);
                    SelectWidget::new("Soil Type", &soil_names, selected)
                        .focused(focused)
                        .render(field_areas[i], buf)
                }
            }
        }
    }

    fn render_side(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(4),
            ])
            .split(area);

        let preview = self.preview;
        nutrient_gauge(Nutrient::Nitrogen, preview.map(|d| d.nitrogen)).render(chunks[0], buf);
        nutrient_gauge(Nutrient::Phosphorus, preview.map(|d| d.phosphorus))
            .render(chunks[1], buf);
        nutrient_gauge(Nutrient::Potassium, preview.map(|d| d.potassium)).render(chunks[2], buf);

        self.render_help(chunks[3], buf);
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.analyzing {
            let para = Paragraph::new(Span::styled("Analyzing leaf image...", Theme::highlight()));
            para.render(inner, buf);
            return;
        }

        let help_text = match self.form.focused_field {
            FormField::Age => format!(
                "Days since transplanting ({}-{}). Young below 40, mature around 50, old from 50.",
                AGE_RANGE.0, AGE_RANGE.1
            ),
            FormField::LeafMethod => {
                "Manual: read the Leaf Color Chart yourself. Image: estimate it from a photo."
                    .to_string()
            }
            FormField::LeafValue => match self.form.leaf_method {
                LeafColorSource::Manual => format!(
                    "LCC reading from {:.0} (pale yellow) to {:.0} (dark green).",
                    LCC_RANGE.0, LCC_RANGE.1
                ),
                LeafColorSource::Image => {
                    "Path to a PNG, JPEG or WebP photo of the leaves. At least 100 leaf \
                     pixels are required."
                        .to_string()
                }
            },
            FormField::Rainfall => format!(
                "Monthly rainfall ({:.0}-{:.0} mm). Above roughly 276 mm the dosage is reduced \
                 for leaching.",
                RAINFALL_RANGE.0, RAINFALL_RANGE.1
            ),
            FormField::Soil => {
                "Loam 1.0, Clay 0.9, Sand 1.2, Organic 0.8 (applied to every nutrient)."
                    .to_string()
            }
        };

        let mut lines = vec![Line::from(Span::styled(help_text, Theme::dim()))];
        if self.preview.is_none() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Preview is shown for manual LCC readings.",
                Theme::dim(),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

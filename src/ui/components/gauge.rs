use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct GaugeWidget<'a> {
    title: &'a str,
    value: Option<f64>,
    unit: &'a str,
    min: f64,
    max: f64,
    color: Color,
    precision: usize,
}

impl<'a> GaugeWidget<'a> {
    pub fn new(title: &'a str, value: Option<f64>, unit: &'a str) -> Self {
        Self {
            title,
            value,
            unit,
            min: 0.0,
            max: 100.0,
            color: Theme::FG,
            precision: 1,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    fn ratio(&self, value: f64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

impl Widget for GaugeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        match self.value {
            Some(value) => {
                let value_str = format!("{:.prec$}{}", value, self.unit, prec = self.precision);
                let value_line =
                    Line::from(vec![Span::styled(value_str, Style::default().fg(self.color))]);
                Paragraph::new(value_line).render(inner, buf);

                if inner.height >= 2 {
                    let bar_area = Rect {
                        x: inner.x,
                        y: inner.y + 1,
                        width: inner.width,
                        height: 1,
                    };

                    let filled = (bar_area.width as f64 * self.ratio(value)) as u16;

                    for x in bar_area.x..bar_area.x + bar_area.width {
                        let ch = if x < bar_area.x + filled {
                            '█'
                        } else {
                            '░'
                        };
                        buf[(x, bar_area.y)].set_char(ch).set_fg(self.color);
                    }
                }
            }
            None => {
                let na_line = Line::from(vec![Span::styled("N/A", Theme::dim())]);
                Paragraph::new(na_line).render(inner, buf);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    pub fn title(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "Nitrogen (N)",
            Nutrient::Phosphorus => "Phosphorus (P)",
            Nutrient::Potassium => "Potassium (K)",
        }
    }

    /// Upper end of the bar: the largest rule output times the sand factor.
    fn max_kg(&self) -> f64 {
        match self {
            Nutrient::Nitrogen => 150.0,
            Nutrient::Phosphorus => 90.0,
            Nutrient::Potassium => 110.0,
        }
    }

    fn color(&self) -> Color {
        match self {
            Nutrient::Nitrogen => Theme::NITROGEN,
            Nutrient::Phosphorus => Theme::PHOSPHORUS,
            Nutrient::Potassium => Theme::POTASSIUM,
        }
    }
}

pub fn nutrient_gauge(nutrient: Nutrient, kg_per_ha: Option<f64>) -> GaugeWidget<'static> {
    GaugeWidget::new(nutrient.title(), kg_per_ha, " kg/ha")
        .range(0.0, nutrient.max_kg())
        .precision(0)
        .color(nutrient.color())
}

pub fn lcc_gauge(title: &str, score: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, score, "")
        .range(1.0, 10.0)
        .precision(2)
        .color(score.map_or(Theme::FG, Theme::lcc_color))
}

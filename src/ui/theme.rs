use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // Base colors
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Green;
    pub const HIGHLIGHT: Color = Color::Cyan;

    // Status colors
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    // Nutrient colors
    pub const NITROGEN: Color = Color::LightGreen;
    pub const PHOSPHORUS: Color = Color::LightMagenta;
    pub const POTASSIUM: Color = Color::LightYellow;

    // Leaf Color Chart shades
    pub const LEAF_PALE: Color = Color::Rgb(196, 200, 80);
    pub const LEAF_LIGHT: Color = Color::Rgb(150, 190, 70);
    pub const LEAF_MEDIUM: Color = Color::Rgb(90, 160, 60);
    pub const LEAF_DARK: Color = Color::Rgb(40, 110, 40);

    // Styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Self::FG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Swatch color for an LCC score.
    pub fn lcc_color(score: f64) -> Color {
        if score <= 3.0 {
            Self::LEAF_PALE
        } else if score <= 5.0 {
            Self::LEAF_LIGHT
        } else if score <= 7.0 {
            Self::LEAF_MEDIUM
        } else {
            Self::LEAF_DARK
        }
    }

    pub fn nav_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_label() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }
}

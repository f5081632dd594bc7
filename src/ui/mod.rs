pub mod components;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use crate::app::StatusLevel;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::{Paragraph, Widget},
};

/// One-line status message shared by all screens.
pub fn render_status(status: Option<(&str, StatusLevel)>, area: Rect, buf: &mut Buffer) {
    if let Some((msg, level)) = status {
        let style = match level {
            StatusLevel::Info => Theme::success(),
            StatusLevel::Error => Theme::error(),
        };
        Paragraph::new(Span::styled(msg, style)).render(area, buf);
    }
}

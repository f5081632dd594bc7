use crate::app::StatusLevel;
use crate::models::HistoryEntry;
use crate::ui::{render_status, Theme};
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

pub struct HistoryScreen<'a> {
    pub entries: &'a [HistoryEntry],
    pub selected_index: usize,
    pub status: Option<(&'a str, StatusLevel)>,
}

impl<'a> HistoryScreen<'a> {
    pub fn new(entries: &'a [HistoryEntry]) -> Self {
        Self {
            entries,
            selected_index: 0,
            status: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_status(mut self, status: Option<(&'a str, StatusLevel)>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for HistoryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("History", Theme::title()),
            Span::styled(format!(" ({} saved)", self.entries.len()), Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        self.render_list(content[0], buf);
        self.render_details(content[1], buf);

        render_status(self.status, chunks[2], buf);

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Navigate ", Theme::nav_label()),
            Span::styled("[d]", Theme::nav_key()),
            Span::styled("Delete ", Theme::nav_label()),
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Calculator ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

impl HistoryScreen<'_> {
    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Saved Recommendations")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() {
            let para = Paragraph::new(Span::styled("No saved recommendations", Theme::dim()));
            para.render(inner, buf);
            return;
        }

        // Keep the selection visible in long lists
        let visible = inner.height as usize;
        let offset = if visible > 0 && self.selected_index >= visible {
            self.selected_index + 1 - visible
        } else {
            0
        };

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .skip(offset)
            .map(|(i, entry)| {
                let style = if i == self.selected_index {
                    Theme::selected()
                } else {
                    Style::default()
                };

                let rounded = entry.dosage.rounded();
                let line = Line::from(vec![
                    Span::styled(
                        entry
                            .created_at
                            .with_timezone(&Local)
                            .format("%Y-%m-%d %H:%M ")
                            .to_string(),
                        Theme::dim(),
                    ),
                    Span::styled(format!("{:>3}d ", entry.age_days), Theme::normal()),
                    Span::styled(
                        format!("LCC {:>4.1} ", entry.leaf_color),
                        Style::default().fg(Theme::lcc_color(entry.leaf_color)),
                    ),
                    Span::styled(
                        format!(
                            "N{} P{} K{}",
                            rounded.nitrogen, rounded.phosphorus, rounded.potassium
                        ),
                        Theme::highlight(),
                    ),
                ]);

                ListItem::new(line).style(style)
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let entry = match self.entries.get(self.selected_index) {
            Some(e) => e,
            None => {
                let para = Paragraph::new(Span::styled(
                    "Select an entry to view details",
                    Theme::dim(),
                ));
                para.render(inner, buf);
                return;
            }
        };

        let rounded = entry.dosage.rounded();
        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{}: ", label), Theme::dim()),
                Span::styled(value, Theme::highlight()),
            ])
        };

        let mut lines = vec![
            row(
                "Saved",
                entry
                    .created_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ),
            Line::from(""),
            row("Plant age", format!("{} days", entry.age_days)),
            row(
                "Leaf color",
                format!("LCC {:.2} ({})", entry.leaf_color, entry.leaf_source),
            ),
            row("Rainfall", format!("{:.0} mm/month", entry.rainfall_mm)),
            row("Soil", entry.soil_label().to_string()),
            Line::from(""),
            row("Nitrogen", format!("{} kg/ha", rounded.nitrogen)),
            row("Phosphorus", format!("{} kg/ha", rounded.phosphorus)),
            row("Potassium", format!("{} kg/ha", rounded.potassium)),
        ];

        if entry.advisory_count > 0 {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} advisory note(s) were raised", entry.advisory_count),
                Theme::warning(),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

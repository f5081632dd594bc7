use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Labeled text field. While editing, the buffer is shown with a block cursor.
pub struct InputWidget<'a> {
    label: &'a str,
    value: &'a str,
    unit: &'a str,
    focused: bool,
    editing: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            unit: "",
            focused: false,
            editing: false,
        }
    }

    pub fn unit(mut self, unit: &'a str) -> Self {
        self.unit = unit;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.editing {
            Line::from(vec![
                Span::styled(self.value, Theme::highlight()),
                Span::styled(" ", Theme::selected()),
            ])
        } else {
            let style = if self.focused {
                Theme::selected()
            } else {
                Theme::normal()
            };
            let value = if self.value.is_empty() {
                Span::styled("(empty)", Theme::dim())
            } else {
                Span::styled(self.value, style)
            };
            Line::from(vec![value, Span::styled(self.unit, Theme::dim())])
        };

        Paragraph::new(line).render(inner, buf);
    }
}

/// Labeled option cycler, shown as `< value >` when focused.
pub struct SelectWidget<'a> {
    label: &'a str,
    options: &'a [&'a str],
    selected: usize,
    focused: bool,
}

impl<'a> SelectWidget<'a> {
    pub fn new(label: &'a str, options: &'a [&'a str], selected: usize) -> Self {
        Self {
            label,
            options,
            selected,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for SelectWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let value = self.options.get(self.selected).unwrap_or(&"");
        let display = if self.focused {
            format!("< {} >", value)
        } else {
            value.to_string()
        };

        let style = if self.focused {
            Theme::highlight()
        } else {
            Theme::normal()
        };

        let mut spans = vec![Span::styled(display, style)];
        if self.focused && self.options.len() > 1 {
            spans.push(Span::styled(
                format!("  {}/{}", self.selected + 1, self.options.len()),
                Theme::dim(),
            ));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Numbered answer options. `selected` highlights the option Enter would
/// submit; punctuation tasks leave it unset.
pub struct OptionsBar<'a> {
    options: &'a [String],
    selected: Option<usize>,
    title: String,
    theme: &'a Theme,
}

impl<'a> OptionsBar<'a> {
    pub fn new(options: &'a [String], title: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            options,
            selected: None,
            title: title.into(),
            theme,
        }
    }

    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }
}

impl Widget for OptionsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let mut spans = Vec::with_capacity(self.options.len() * 2);
        for (i, option) in self.options.iter().enumerate() {
            let is_selected = self.selected == Some(i);
            let style = if is_selected {
                Style::default()
                    .fg(colors.gap_selected_fg())
                    .bg(colors.gap_selected_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            spans.push(Span::styled(
                format!("[{}]", i + 1),
                Style::default().fg(colors.text_pending()),
            ));
            spans.push(Span::styled(format!(" {option} "), style));
            spans.push(Span::raw("  "));
        }

        Paragraph::new(Line::from(spans))
            .block(block)
            .render(area, buf);
    }
}

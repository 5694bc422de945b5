use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use skyryba::session::{FinishReason, SessionResult};
use skyryba::store::schema::ProfileData;
use skyryba::task::Task;

use crate::ui::theme::Theme;

pub struct Summary<'a> {
    result: &'a SessionResult,
    tasks: &'a [Task],
    profile: Option<&'a ProfileData>,
    selected: usize,
    message: Option<String>,
    theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(result: &'a SessionResult, tasks: &'a [Task], selected: usize, theme: &'a Theme) -> Self {
        Self {
            result,
            tasks,
            profile: None,
            selected,
            message: None,
            theme,
        }
    }

    /// Saved learner totals; guests have none.
    pub fn profile(mut self, profile: Option<&'a ProfileData>) -> Self {
        self.profile = profile;
        self
    }

    pub fn message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("summary.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(inner);

        let mut header = vec![
            Line::from(Span::styled(
                t!("summary.score", score = self.result.score).into_owned(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!(
                    "summary.correct",
                    correct = self.result.correct_count,
                    total = self.result.total_tasks,
                    accuracy = format!("{:.0}", self.result.accuracy())
                )
                .into_owned(),
                Style::default().fg(colors.fg()),
            )),
        ];
        if self.result.finish_reason == FinishReason::TimeExpired {
            header.push(Line::from(Span::styled(
                t!("summary.time_expired").into_owned(),
                Style::default().fg(colors.warning()),
            )));
        }
        match self.profile {
            Some(profile) => header.push(Line::from(Span::styled(
                t!(
                    "summary.profile",
                    best = profile.high_score,
                    streak = profile.streak_days
                )
                .into_owned(),
                Style::default().fg(colors.text_pending()),
            ))),
            None => header.push(Line::from(Span::styled(
                t!("summary.guest").into_owned(),
                Style::default().fg(colors.text_pending()),
            ))),
        }
        Paragraph::new(header).render(layout[0], buf);

        let width = layout[1].width.saturating_sub(8) as usize;
        let rows: Vec<Line> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let is_selected = i == self.selected;
                let (mark, mark_color) = if task.task_status {
                    ("\u{2713}", colors.success())
                } else {
                    ("\u{2717}", colors.error())
                };
                let text_style = if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(vec![
                    Span::styled(if is_selected { " > " } else { "   " }, text_style),
                    Span::styled(format!("{mark} "), Style::default().fg(mark_color)),
                    Span::styled(format!("{:>2}. ", i + 1), text_style),
                    Span::styled(truncate(&task.sentence, width), text_style),
                ])
            })
            .collect();

        // Keep the selected row in view.
        let visible = layout[1].height as usize;
        let offset = (self.selected + 1).saturating_sub(visible);
        Paragraph::new(rows)
            .scroll((offset as u16, 0))
            .render(layout[1], buf);

        if let Some(message) = self.message {
            Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(colors.warning()),
            )))
            .render(layout[2], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_sentences_are_truncated() {
        assert_eq!(truncate("Vilnius", 10), "Vilnius");
        assert_eq!(truncate("Vilnius yra sostinė", 8), "Vilnius\u{2026}");
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use skyryba::task::Task;

use crate::ui::components::sentence_view::SentenceView;
use crate::ui::theme::Theme;

/// Read-only look at one finished task: what was submitted, what was
/// expected and why.
pub struct TaskReview<'a> {
    task: &'a Task,
    index: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> TaskReview<'a> {
    pub fn new(task: &'a Task, index: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            task,
            index,
            total,
            theme,
        }
    }
}

impl Widget for TaskReview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(6)])
            .split(area);

        let title = t!("review.title", current = self.index + 1, total = self.total).into_owned();
        SentenceView::new(self.task, title, self.theme)
            .show_cursor(false)
            .render(layout[0], buf);

        let (verdict, verdict_color) = if self.task.task_status {
            (t!("feedback.correct"), colors.success())
        } else {
            (t!("review.not_correct"), colors.error())
        };
        let label = Style::default().fg(colors.text_pending());

        let mut lines = vec![
            Line::from(Span::styled(
                verdict.into_owned(),
                Style::default()
                    .fg(verdict_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("review.correct_answer")), label),
                Span::styled(
                    self.task.correct_answer.clone(),
                    Style::default().fg(colors.success()),
                ),
            ]),
        ];
        if let Some(topic) = &self.task.topic {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", t!("review.topic")), label),
                Span::styled(topic.clone(), Style::default().fg(colors.fg())),
            ]));
        }
        if !self.task.explanation.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{}:", t!("review.explanation")),
                label,
            )));
            lines.push(Line::from(Span::styled(
                self.task.explanation.clone(),
                Style::default().fg(colors.fg()),
            )));
        }

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(layout[1], buf);
    }
}

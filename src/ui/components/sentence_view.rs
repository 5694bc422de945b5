use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use skyryba::engine::punctuation::is_punctuation;
use skyryba::task::Task;

use crate::ui::theme::Theme;

/// The working sentence with its gaps marked. Spelling tasks show the blank
/// as-is, highlighted.
pub struct SentenceView<'a> {
    task: &'a Task,
    title: String,
    show_cursor: bool,
    theme: &'a Theme,
}

impl<'a> SentenceView<'a> {
    pub fn new(task: &'a Task, title: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            task,
            title: title.into(),
            show_cursor: true,
            theme,
        }
    }

    pub fn show_cursor(mut self, show: bool) -> Self {
        self.show_cursor = show;
        self
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Plain(char),
    Gap { selected: bool },
    Mark(char),
    Blank,
}

fn tokens(task: &Task, show_cursor: bool) -> Vec<Token> {
    let selected = task.highlights.selected().map(|h| h.space_index);
    let chars: Vec<char> = task.user_text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            if task.highlights.at(i).is_some() {
                return Token::Gap {
                    selected: show_cursor && selected == Some(i),
                };
            }
            let before_gap = task.highlights.at(i + 1).is_some_and(|h| h.has_punctuation);
            if before_gap && is_punctuation(ch) {
                Token::Mark(ch)
            } else if ch == '_' && !task.kind.is_editable() {
                Token::Blank
            } else {
                Token::Plain(ch)
            }
        })
        .collect()
}

impl Widget for SentenceView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let spans: Vec<Span> = tokens(self.task, self.show_cursor)
            .into_iter()
            .map(|token| match token {
                Token::Plain(ch) => Span::styled(ch.to_string(), Style::default().fg(colors.fg())),
                Token::Gap { selected: true } => Span::styled(
                    " ",
                    Style::default()
                        .fg(colors.gap_selected_fg())
                        .bg(colors.gap_selected_bg()),
                ),
                Token::Gap { selected: false } => {
                    Span::styled("\u{00b7}", Style::default().fg(colors.gap()))
                }
                Token::Mark(ch) => Span::styled(
                    ch.to_string(),
                    Style::default().fg(colors.mark()).add_modifier(Modifier::BOLD),
                ),
                Token::Blank => Span::styled(
                    "_",
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ),
            })
            .collect();

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(vec![Line::from(""), Line::from(spans)])
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyryba::engine::editor::insert_mark;
    use skyryba::task::TaskKind;

    fn task() -> Task {
        Task::new(
            TaskKind::Punctuation,
            "Hello world now",
            vec![",".to_string()],
            "Hello, world now",
            "",
        )
    }

    #[test]
    fn gaps_and_inserted_marks_are_tokenized() {
        let mut task = task();
        task.highlights.select(5);
        insert_mark(&mut task, ",");
        task.highlights.select(12);

        let tokens = tokens(&task, true);
        assert_eq!(tokens[5], Token::Mark(','));
        assert_eq!(tokens[6], Token::Gap { selected: false });
        assert_eq!(tokens[12], Token::Gap { selected: true });
        assert_eq!(tokens[0], Token::Plain('H'));
    }

    #[test]
    fn cursor_can_be_hidden() {
        let mut task = task();
        task.highlights.select(5);
        let tokens = tokens(&task, false);
        assert_eq!(tokens[5], Token::Gap { selected: false });
    }

    #[test]
    fn spelling_blank_is_marked() {
        let task = Task::new(
            TaskKind::Spelling,
            "Liet_vos",
            vec!["u".to_string()],
            "u",
            "",
        );
        assert_eq!(tokens(&task, true)[4], Token::Blank);
    }
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(footer_lines.max(1)),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Exercise screen: sentence, feedback line, options and the optional timer.
pub struct ExerciseLayout {
    pub sentence: Rect,
    pub feedback: Rect,
    pub options: Rect,
    pub timer: Option<Rect>,
}

impl ExerciseLayout {
    pub fn new(area: Rect, show_timer: bool) -> Self {
        let mut constraints = vec![
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(3),
        ];
        if show_timer {
            constraints.push(Constraint::Length(3));
        }
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        Self {
            sentence: rows[0],
            feedback: rows[1],
            options: rows[2],
            timer: show_timer.then(|| rows[3]),
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_wrap_to_width() {
        let lines = pack_hint_lines(&["[Enter] Submit", "[Tab] Skip", "[Esc] Menu"], 28);
        assert_eq!(lines, vec![" [Enter] Submit  [Tab] Skip", " [Esc] Menu"]);
        assert!(pack_hint_lines(&["x"], 0).is_empty());
    }

    #[test]
    fn centered_rect_stays_inside_small_areas() {
        let area = Rect::new(0, 0, 30, 8);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, area);

        let area = Rect::new(0, 0, 200, 60);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, Rect::new(50, 15, 100, 30));
    }

    #[test]
    fn exercise_layout_omits_timer_when_disabled() {
        let area = Rect::new(0, 0, 80, 20);
        assert!(ExerciseLayout::new(area, false).timer.is_none());
        let with_timer = ExerciseLayout::new(area, true);
        assert_eq!(with_timer.timer.map(|r| r.height), Some(3));
    }
}

use crate::engine::punctuation::is_punctuation;
use crate::task::{Task, TaskKind};

/// Judge the learner's answer for `task`.
///
/// Punctuation tasks grade the working text; spelling tasks grade the chosen
/// option. Generic tasks compare the chosen option, or the working text when
/// nothing was chosen, against the correct answer verbatim.
pub fn is_answer_correct(task: &Task, selected: Option<&str>) -> bool {
    match task.kind {
        TaskKind::Punctuation => punctuation_matches(&task.user_text, &task.correct_answer),
        TaskKind::Spelling => selected.unwrap_or("") == task.correct_answer,
        TaskKind::Generic => selected.unwrap_or(&task.user_text) == task.correct_answer,
    }
}

/// Only punctuation placement is graded: the texts must be the same length
/// and agree wherever the correct text has a punctuation character.
pub fn punctuation_matches(user_text: &str, correct: &str) -> bool {
    if user_text.is_empty() || correct.is_empty() {
        return false;
    }
    let user: Vec<char> = user_text.chars().collect();
    let expected: Vec<char> = correct.chars().collect();
    if user.len() != expected.len() {
        return false;
    }
    expected
        .iter()
        .zip(&user)
        .filter(|(want, _)| is_punctuation(**want))
        .all(|(want, got)| want == got)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spelling(answer: &str) -> Task {
        Task::new(
            TaskKind::Spelling,
            "Lietuvoje yra daug gra_ių ežerų.",
            vec!["ž".into(), "š".into(), "s".into(), "z".into()],
            answer,
            "",
        )
    }

    #[test]
    fn exact_match_is_correct() {
        assert!(punctuation_matches("Hello, world!", "Hello, world!"));
    }

    #[test]
    fn missing_mark_is_incorrect() {
        assert!(!punctuation_matches("Hello world", "Hello, world!"));
    }

    #[test]
    fn length_mismatch_is_incorrect_even_if_marks_align() {
        assert!(!punctuation_matches("Hello, world!!", "Hello, world!"));
        assert!(!punctuation_matches("Hello, world", "Hello, world!"));
    }

    #[test]
    fn letters_are_not_compared() {
        assert!(punctuation_matches("Hallo, world!", "Hello, world!"));
    }

    #[test]
    fn wrong_mark_in_right_place_is_incorrect() {
        assert!(!punctuation_matches("Hello; world!", "Hello, world!"));
    }

    #[test]
    fn extra_mark_over_a_letter_position_is_ignored() {
        // Non-punctuation positions of the answer are never inspected.
        assert!(punctuation_matches("Hello,,world", "Hello, world"));
    }

    #[test]
    fn empty_operands_are_incorrect() {
        assert!(!punctuation_matches("", "Hi!"));
        assert!(!punctuation_matches("Hi!", ""));
        assert!(!punctuation_matches("", ""));
    }

    #[test]
    fn punctuation_task_grades_working_text() {
        let mut task = Task::new(
            TaskKind::Punctuation,
            "Hello world",
            vec![",".into()],
            "Hello, world",
            "",
        );
        assert!(!is_answer_correct(&task, None));
        task.user_text = "Hello, world".into();
        assert!(is_answer_correct(&task, Some("ignored")));
    }

    #[test]
    fn spelling_is_exact_and_case_sensitive() {
        let task = spelling("ž");
        assert!(is_answer_correct(&task, Some("ž")));
        assert!(!is_answer_correct(&task, Some("Ž")));
        assert!(!is_answer_correct(&task, Some(" ž")));
        assert!(!is_answer_correct(&task, None));
    }

    #[test]
    fn generic_falls_back_to_working_text() {
        let mut task = Task::new(TaskKind::Generic, "2 + 2", vec![], "4", "");
        assert!(is_answer_correct(&task, Some("4")));
        task.user_text = "4".into();
        assert!(is_answer_correct(&task, None));
    }
}

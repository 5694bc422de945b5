//! Inserting, replacing and deleting punctuation marks at the selected gap
//! of a task's working text.
//!
//! All offsets are character offsets. After every edit each gap's
//! `space_index` still points at the same space character it did before.

use crate::engine::punctuation::is_punctuation;
use crate::task::Task;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// A new mark was inserted in front of the gap at this offset.
    Inserted { at: usize },
    /// The mark right before the gap was swapped for another one.
    Replaced { at: usize },
    /// The mark right before the gap was removed.
    Deleted { at: usize },
    Unchanged,
}

impl EditOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, EditOutcome::Unchanged)
    }
}

fn byte_offset(text: &str, char_index: usize) -> Option<usize> {
    if char_index == text.chars().count() {
        return Some(text.len());
    }
    text.char_indices().nth(char_index).map(|(b, _)| b)
}

fn char_before(text: &str, char_index: usize) -> Option<char> {
    char_index
        .checked_sub(1)
        .and_then(|i| text.chars().nth(i))
}

/// Remove the character at `char_index` and put `replacement` in its place.
fn splice(text: &mut String, char_index: usize, replacement: &str) -> bool {
    let Some(start) = byte_offset(text, char_index) else {
        return false;
    };
    let Some(ch) = text[start..].chars().next() else {
        return false;
    };
    text.replace_range(start..start + ch.len_utf8(), replacement);
    true
}

/// Place `mark` at the selected gap.
///
/// When the gap is already preceded by a punctuation character, that
/// character is replaced instead of stacking a second mark. Later gaps move
/// by however many characters the text grew.
pub fn insert_mark(task: &mut Task, mark: &str) -> EditOutcome {
    if mark.is_empty() {
        return EditOutcome::Unchanged;
    }
    if task.user_text.is_empty() {
        task.user_text = task.sentence.clone();
    }
    let Some(id) = task.highlights.selected_id() else {
        return EditOutcome::Unchanged;
    };
    let Some(index) = task.highlights.get(id).map(|h| h.space_index) else {
        return EditOutcome::Unchanged;
    };
    let mark_len = mark.chars().count() as isize;

    if index > 0 && char_before(&task.user_text, index).is_some_and(is_punctuation) {
        if !splice(&mut task.user_text, index - 1, mark) {
            return EditOutcome::Unchanged;
        }
        // A one-character mark replaced by a longer one still pushes the
        // following gaps; same-length swaps leave every offset alone.
        task.highlights.shift(index, mark_len - 1);
        if let Some(h) = task.highlights.get_mut(id) {
            h.is_selected = false;
        }
        return EditOutcome::Replaced { at: index - 1 };
    }

    let Some(at) = byte_offset(&task.user_text, index) else {
        return EditOutcome::Unchanged;
    };
    task.user_text.insert_str(at, mark);
    task.highlights.shift(index, mark_len);
    if let Some(h) = task.highlights.get_mut(id) {
        h.has_punctuation = true;
        h.is_selected = false;
    }
    EditOutcome::Inserted { at: index }
}

/// Remove the punctuation character right before the selected gap, if any.
pub fn delete_mark(task: &mut Task) -> EditOutcome {
    if task.user_text.is_empty() {
        return EditOutcome::Unchanged;
    }
    let Some(id) = task.highlights.selected_id() else {
        return EditOutcome::Unchanged;
    };
    let Some(index) = task.highlights.get(id).map(|h| h.space_index) else {
        return EditOutcome::Unchanged;
    };
    if index == 0 || !char_before(&task.user_text, index).is_some_and(is_punctuation) {
        return EditOutcome::Unchanged;
    }
    if !splice(&mut task.user_text, index - 1, "") {
        return EditOutcome::Unchanged;
    }
    task.highlights.shift(index, -1);
    if let Some(h) = task.highlights.get_mut(id) {
        h.has_punctuation = false;
        h.is_selected = false;
    }
    EditOutcome::Deleted { at: index - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskKind;

    fn task(sentence: &str) -> Task {
        Task::new(
            TaskKind::Punctuation,
            sentence,
            vec![",".to_string(), "!".to_string()],
            sentence,
            "",
        )
    }

    fn gap(task: &Task, ordinal: usize) -> usize {
        task.highlights.nth(ordinal).map(|h| h.space_index).unwrap()
    }

    #[test]
    fn insert_without_selection_does_nothing() {
        let mut t = task("Hello world");
        assert_eq!(insert_mark(&mut t, ","), EditOutcome::Unchanged);
        assert_eq!(t.user_text, "Hello world");
    }

    #[test]
    fn insert_shifts_the_gap() {
        let mut t = task("Hello world");
        t.highlights.select(5);
        assert_eq!(insert_mark(&mut t, ","), EditOutcome::Inserted { at: 5 });
        assert_eq!(t.user_text, "Hello, world");
        let h = t.highlights.nth(0).unwrap();
        assert_eq!(h.space_index, 6);
        assert!(h.has_punctuation);
        assert!(!h.is_selected);
    }

    #[test]
    fn insert_replaces_existing_mark() {
        let mut t = task("Hello world");
        t.highlights.select(5);
        insert_mark(&mut t, ",");
        t.highlights.select(6);
        assert_eq!(insert_mark(&mut t, "!"), EditOutcome::Replaced { at: 5 });
        assert_eq!(t.user_text, "Hello! world");
        assert_eq!(gap(&t, 0), 6);
        assert!(!t.highlights.nth(0).unwrap().is_selected);
    }

    #[test]
    fn insert_only_moves_later_gaps() {
        let mut t = task("one two three four");
        t.highlights.select(7);
        insert_mark(&mut t, ",");
        assert_eq!(t.user_text, "one two, three four");
        assert_eq!(gap(&t, 0), 3);
        assert_eq!(gap(&t, 1), 8);
        assert_eq!(gap(&t, 2), 14);
    }

    #[test]
    fn multi_char_insert_shifts_by_its_length() {
        let mut t = task("Vilnius sostinė");
        t.highlights.select(7);
        insert_mark(&mut t, "...");
        assert_eq!(t.user_text, "Vilnius... sostinė");
        assert_eq!(gap(&t, 0), 10);
    }

    #[test]
    fn wider_replacement_keeps_later_gaps_on_spaces() {
        let mut t = task("a b c");
        t.highlights.select(1);
        insert_mark(&mut t, ",");
        assert_eq!(t.user_text, "a, b c");
        t.highlights.select(2);
        assert_eq!(insert_mark(&mut t, "?!"), EditOutcome::Replaced { at: 1 });
        assert_eq!(t.user_text, "a?! b c");
        assert_eq!(gap(&t, 0), 3);
        assert_eq!(gap(&t, 1), 5);
        let chars: Vec<char> = t.user_text.chars().collect();
        assert!(t.highlights.iter().all(|h| chars[h.space_index] == ' '));
    }

    #[test]
    fn insert_reseeds_empty_working_text() {
        let mut t = task("Hello world");
        t.user_text.clear();
        t.highlights.select(5);
        insert_mark(&mut t, ",");
        assert_eq!(t.user_text, "Hello, world");
    }

    #[test]
    fn empty_mark_is_ignored() {
        let mut t = task("Hello world");
        t.highlights.select(5);
        assert_eq!(insert_mark(&mut t, ""), EditOutcome::Unchanged);
        assert!(t.highlights.nth(0).unwrap().is_selected);
    }

    #[test]
    fn insert_works_after_multibyte_letters() {
        let mut t = task("Petriukas surado piniginę kuri");
        t.highlights.select(25);
        insert_mark(&mut t, ",");
        assert_eq!(t.user_text, "Petriukas surado piniginę, kuri");
    }

    #[test]
    fn delete_is_inverse_of_insert() {
        let mut t = task("Hello world");
        t.highlights.select(5);
        insert_mark(&mut t, ",");
        t.highlights.select(6);
        assert_eq!(delete_mark(&mut t), EditOutcome::Deleted { at: 5 });
        assert_eq!(t.user_text, "Hello world");
        let h = t.highlights.nth(0).unwrap();
        assert_eq!(h.space_index, 5);
        assert!(!h.has_punctuation);
        assert!(!h.is_selected);
    }

    #[test]
    fn delete_without_selection_does_nothing() {
        let mut t = task("Hello, world");
        assert_eq!(delete_mark(&mut t), EditOutcome::Unchanged);
        assert_eq!(t.user_text, "Hello, world");
    }

    #[test]
    fn delete_without_mark_does_nothing() {
        let mut t = task("Hello world test");
        t.highlights.select(5);
        assert_eq!(delete_mark(&mut t), EditOutcome::Unchanged);
        assert_eq!(t.user_text, "Hello world test");
        assert!(!t.highlights.nth(0).unwrap().has_punctuation);
    }

    #[test]
    fn delete_removes_original_sentence_punctuation() {
        let mut t = task("Taip, gerai tikrai");
        t.highlights.select(5);
        delete_mark(&mut t);
        assert_eq!(t.user_text, "Taip gerai tikrai");
        assert_eq!(gap(&t, 0), 4);
        assert_eq!(gap(&t, 1), 10);
    }

    #[test]
    fn delete_on_empty_text_does_nothing() {
        let mut t = task("Hello world");
        t.highlights.select(5);
        t.user_text.clear();
        assert_eq!(delete_mark(&mut t), EditOutcome::Unchanged);
        assert!(t.user_text.is_empty());
    }
}

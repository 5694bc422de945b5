pub mod defaults;
pub mod remote;
pub mod source;
pub mod upload;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::engine::highlight::HighlightSet;

pub use source::TaskSource;
pub use upload::TaskUploadError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Punctuation,
    Spelling,
    Generic,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Punctuation => "punctuation",
            TaskKind::Spelling => "spelling",
            TaskKind::Generic => "generic",
        }
    }

    /// Whether the learner edits the sentence (true) or picks one option.
    pub fn is_editable(self) -> bool {
        matches!(self, TaskKind::Punctuation)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub kind: TaskKind,
    pub sentence: String,
    #[serde(default)]
    pub user_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub task_status: bool,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(skip)]
    pub highlights: HighlightSet,
}

impl Task {
    pub fn new(
        kind: TaskKind,
        sentence: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        let sentence = sentence.into();
        let mut task = Self {
            kind,
            user_text: sentence.clone(),
            sentence,
            options,
            correct_answer: correct_answer.into(),
            explanation: explanation.into(),
            task_status: false,
            topic: None,
            highlights: HighlightSet::default(),
        };
        task.reset();
        task
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Back to the untouched sentence: working text reseeded, verdict cleared
    /// and, for punctuation tasks, gaps rebuilt.
    pub fn reset(&mut self) {
        self.user_text = self.sentence.clone();
        self.task_status = false;
        if self.kind.is_editable() {
            self.highlights.initialize(&self.sentence);
        } else {
            self.highlights = HighlightSet::default();
        }
    }
}

/// Optionally shuffle and truncate a task list before a session starts.
/// A `limit` of zero keeps every task.
pub fn prepare<R: Rng + ?Sized>(
    mut tasks: Vec<Task>,
    shuffle: bool,
    limit: usize,
    rng: &mut R,
) -> Vec<Task> {
    if shuffle {
        tasks.shuffle(rng);
    }
    if limit > 0 {
        tasks.truncate(limit);
    }
    tasks
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn punctuation(sentence: &str, answer: &str) -> Task {
        Task::new(
            TaskKind::Punctuation,
            sentence,
            vec![",".to_string()],
            answer,
            "",
        )
    }

    #[test]
    fn new_task_is_ready_to_edit() {
        let task = punctuation("Hello world", "Hello, world");
        assert_eq!(task.user_text, "Hello world");
        assert_eq!(task.highlights.len(), 1);
        assert!(!task.task_status);
    }

    #[test]
    fn spelling_tasks_have_no_gaps() {
        let task = Task::new(
            TaskKind::Spelling,
            "Vilnius yra Liet_vos sostinė.",
            vec!["u".to_string(), "ū".to_string()],
            "u",
            "",
        );
        assert!(task.highlights.is_empty());
    }

    #[test]
    fn reset_restores_sentence_and_gaps() {
        let mut task = punctuation("Hello world", "Hello, world");
        task.user_text = "Hello, world".to_string();
        task.task_status = true;
        task.highlights.shift(0, 1);
        task.reset();
        assert_eq!(task.user_text, "Hello world");
        assert!(!task.task_status);
        assert_eq!(task.highlights.nth(0).map(|h| h.space_index), Some(5));
    }

    #[test]
    fn prepare_limits_and_keeps_order_without_shuffle() {
        let tasks: Vec<Task> = (0..5)
            .map(|i| punctuation(&format!("a {i}"), "a, b"))
            .collect();
        let mut rng = SmallRng::seed_from_u64(7);
        let prepared = prepare(tasks, false, 3, &mut rng);
        let sentences: Vec<&str> = prepared.iter().map(|t| t.sentence.as_str()).collect();
        assert_eq!(sentences, vec!["a 0", "a 1", "a 2"]);
    }

    #[test]
    fn prepare_shuffle_keeps_membership() {
        let tasks: Vec<Task> = (0..8)
            .map(|i| punctuation(&format!("a {i}"), "a, b"))
            .collect();
        let mut rng = SmallRng::seed_from_u64(42);
        let prepared = prepare(tasks, true, 0, &mut rng);
        let mut sentences: Vec<String> = prepared.into_iter().map(|t| t.sentence).collect();
        sentences.sort();
        let expected: Vec<String> = (0..8).map(|i| format!("a {i}")).collect();
        assert_eq!(sentences, expected);
    }
}

//! Turning an uploaded task file into a validated task list.
//!
//! The expected file is a JSON array of objects carrying `Sentence`,
//! `Options`, `CorrectAnswer` and `Explanation` (snake_case spellings are
//! accepted too) plus an optional `Topic`. Everything is rejected here, before
//! a session ever sees it.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use icu_normalizer::ComposingNormalizerBorrowed;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::engine::punctuation::{ALLOWED_MARKS, is_allowed_mark};
use crate::task::{Task, TaskKind};

#[derive(Debug, Error)]
pub enum TaskUploadError {
    #[error("task file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("task file contains no tasks")]
    Empty,

    #[error("task {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("task {index}: options are empty")]
    NoOptions { index: usize },

    #[error("task {index}: punctuation options may only be {allowed}, found `{found}`")]
    InvalidPunctuationOption {
        index: usize,
        found: String,
        allowed: String,
    },

    #[error("task {index}: spelling options must be letters, at most 3 characters, found `{found}`")]
    InvalidSpellingOption { index: usize, found: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct RawTask {
    #[serde(alias = "Sentence")]
    sentence: Option<String>,
    #[serde(alias = "Options")]
    options: Option<Vec<String>>,
    #[serde(alias = "CorrectAnswer", alias = "correctAnswer")]
    correct_answer: Option<String>,
    #[serde(alias = "Explanation")]
    explanation: Option<String>,
    #[serde(alias = "Topic")]
    topic: Option<String>,
}

fn nfc(text: &str) -> String {
    match ComposingNormalizerBorrowed::new_nfc().normalize(text) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

fn require<T>(value: Option<T>, index: usize, field: &'static str) -> Result<T, TaskUploadError> {
    value.ok_or(TaskUploadError::MissingField { index, field })
}

fn check_options(kind: TaskKind, index: usize, options: &[String]) -> Result<(), TaskUploadError> {
    if options.is_empty() {
        return Err(TaskUploadError::NoOptions { index });
    }
    match kind {
        TaskKind::Punctuation => {
            if let Some(bad) = options.iter().find(|o| !is_allowed_mark(o)) {
                return Err(TaskUploadError::InvalidPunctuationOption {
                    index,
                    found: bad.clone(),
                    allowed: ALLOWED_MARKS.join(" "),
                });
            }
        }
        TaskKind::Spelling => {
            let valid = |o: &String| {
                o.chars().count() <= 3 && o.chars().next().is_some_and(char::is_alphabetic)
            };
            if let Some(bad) = options.iter().find(|o| !valid(*o)) {
                return Err(TaskUploadError::InvalidSpellingOption {
                    index,
                    found: bad.clone(),
                });
            }
        }
        TaskKind::Generic => {}
    }
    Ok(())
}

/// Parse and validate `json` as a list of `kind` tasks.
pub fn parse_tasks(json: &str, kind: TaskKind) -> Result<Vec<Task>, TaskUploadError> {
    let raw: Vec<RawTask> = serde_json::from_str(json)?;
    if raw.is_empty() {
        return Err(TaskUploadError::Empty);
    }

    let mut tasks = Vec::with_capacity(raw.len());
    for (index, entry) in raw.into_iter().enumerate() {
        let sentence = require(entry.sentence, index, "Sentence")?;
        let options = require(entry.options, index, "Options")?;
        let correct_answer = require(entry.correct_answer, index, "CorrectAnswer")?;
        let explanation = require(entry.explanation, index, "Explanation")?;

        let options: Vec<String> = options.iter().map(|o| nfc(o)).collect();
        check_options(kind, index, &options)?;

        let mut task = Task::new(
            kind,
            nfc(&sentence),
            options,
            nfc(&correct_answer),
            nfc(&explanation),
        );
        task.topic = entry.topic;
        tasks.push(task);
    }
    Ok(tasks)
}

pub fn load_file(path: &Path, kind: TaskKind) -> Result<Vec<Task>, TaskUploadError> {
    let content = fs::read_to_string(path).map_err(|source| TaskUploadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tasks(&content, kind).inspect_err(|err| {
        warn!(path = %path.display(), error = %err, "rejected task file");
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const PUNCTUATION_JSON: &str = r#"[
        {
            "Sentence": "Petriukas surado piniginę kuri neturėjo jokių pinigų.",
            "Options": [".", ",", ";", ":", "!", "?"],
            "CorrectAnswer": "Petriukas surado piniginę, kuri neturėjo jokių pinigų.",
            "Explanation": "Kablelis čia būtinas prieš jungtuką „kuri“.",
            "Topic": "jungtukai"
        }
    ]"#;

    #[test]
    fn parses_pascal_case_upload() {
        let tasks = parse_tasks(PUNCTUATION_JSON, TaskKind::Punctuation).unwrap();
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.kind, TaskKind::Punctuation);
        assert_eq!(task.user_text, task.sentence);
        assert_eq!(task.highlights.len(), 6);
        assert_eq!(task.topic.as_deref(), Some("jungtukai"));
        assert_eq!(task.options.len(), 6);
    }

    #[test]
    fn parses_snake_case_upload() {
        let json = r#"[{"sentence": "a b", "options": ["u", "ū"], "correct_answer": "u", "explanation": ""}]"#;
        let tasks = parse_tasks(json, TaskKind::Spelling).unwrap();
        assert_eq!(tasks[0].correct_answer, "u");
        assert!(tasks[0].topic.is_none());
    }

    #[test]
    fn duplicate_options_are_kept_in_order() {
        let json = r#"[{"Sentence": "a b", "Options": [",", ".", ","], "CorrectAnswer": "a, b", "Explanation": ""}]"#;
        let tasks = parse_tasks(json, TaskKind::Punctuation).unwrap();
        assert_eq!(tasks[0].options, vec![",", ".", ","]);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_tasks("{not json", TaskKind::Punctuation).unwrap_err();
        assert!(matches!(err, TaskUploadError::Malformed(_)));
        let err = parse_tasks(r#"{"Sentence": "x"}"#, TaskKind::Punctuation).unwrap_err();
        assert!(matches!(err, TaskUploadError::Malformed(_)));
    }

    #[test]
    fn rejects_empty_list() {
        let err = parse_tasks("[]", TaskKind::Spelling).unwrap_err();
        assert!(matches!(err, TaskUploadError::Empty));
    }

    #[test]
    fn reports_first_missing_field_with_index() {
        let json = r#"[
            {"Sentence": "a b", "Options": [","], "CorrectAnswer": "a, b", "Explanation": ""},
            {"Sentence": "a b", "Options": [","], "Explanation": ""}
        ]"#;
        let err = parse_tasks(json, TaskKind::Punctuation).unwrap_err();
        match err {
            TaskUploadError::MissingField { index, field } => {
                assert_eq!(index, 1);
                assert_eq!(field, "CorrectAnswer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_options() {
        let json = r#"[{"Sentence": "a b", "Options": [], "CorrectAnswer": "a, b", "Explanation": ""}]"#;
        let err = parse_tasks(json, TaskKind::Punctuation).unwrap_err();
        assert!(matches!(err, TaskUploadError::NoOptions { index: 0 }));
    }

    #[test]
    fn punctuation_options_must_be_allowed_marks() {
        let json = r#"[{"Sentence": "a b", "Options": [",", "-"], "CorrectAnswer": "a - b", "Explanation": ""}]"#;
        let err = parse_tasks(json, TaskKind::Punctuation).unwrap_err();
        assert!(matches!(
            err,
            TaskUploadError::InvalidPunctuationOption { ref found, .. } if found == "-"
        ));
        assert!(err.to_string().contains(". , ; : ! ?"));
    }

    #[test]
    fn spelling_options_must_be_short_letters() {
        for bad in ["uooo", "1", "", "-a"] {
            let json = format!(
                r#"[{{"Sentence": "a_b", "Options": ["u", "{bad}"], "CorrectAnswer": "u", "Explanation": ""}}]"#
            );
            let err = parse_tasks(&json, TaskKind::Spelling).unwrap_err();
            assert!(
                matches!(err, TaskUploadError::InvalidSpellingOption { .. }),
                "{bad:?} should be rejected"
            );
        }
        let json = r#"[{"Sentence": "a_b", "Options": ["uo", "ą"], "CorrectAnswer": "uo", "Explanation": ""}]"#;
        assert!(parse_tasks(json, TaskKind::Spelling).is_ok());
    }

    #[test]
    fn decomposed_text_is_normalized() {
        // "ė" written as e + combining dot above
        let json = "[{\"Sentence\": \"sostine\u{0307} yra\", \"Options\": [\",\"], \"CorrectAnswer\": \"sostine\u{0307}, yra\", \"Explanation\": \"\"}]";
        let tasks = parse_tasks(json, TaskKind::Punctuation).unwrap();
        assert_eq!(tasks[0].sentence, "sostinė yra");
        assert_eq!(tasks[0].highlights.nth(0).map(|h| h.space_index), Some(7));
    }

    #[test]
    fn load_file_reports_missing_path() {
        let err = load_file(Path::new("/nonexistent/tasks.json"), TaskKind::Spelling).unwrap_err();
        assert!(matches!(err, TaskUploadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/tasks.json"));
    }

    #[test]
    fn load_file_reads_tasks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PUNCTUATION_JSON.as_bytes()).unwrap();
        let tasks = load_file(file.path(), TaskKind::Punctuation).unwrap();
        assert_eq!(tasks.len(), 1);
    }
}

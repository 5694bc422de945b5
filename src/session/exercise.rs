//! One run through an ordered list of tasks.
//!
//! ```text
//! NotStarted --start--> Practicing --last answer / skip / time out--> Summary
//!                           |                                           |
//!                           +-----------jump_to_task--> Reviewing <-----+
//! ```
//!
//! `restart` is the only way back to `Practicing` once the summary is reached.
//! The session has a single owner; callers that share it across threads must
//! wrap it in a lock so no operation ever observes half-shifted gaps.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::engine::editor::{self, EditOutcome};
use crate::engine::grader;
use crate::engine::scoring::{self, SUBMIT_MULTIPLIER};
use crate::session::result::{FinishReason, SessionResult};
use crate::session::sink::{Identity, ProgressSink};
use crate::task::{Task, TaskKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    NotStarted,
    Practicing,
    Reviewing,
    Summary,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { correct_answer: String },
    InvalidTaskIndex { index: usize },
}

/// Outcome of the most recent submission, kept after the session moves on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub task_index: usize,
    pub correct: bool,
    pub points: u32,
}

pub struct ExerciseSession {
    tasks: Vec<Task>,
    current: usize,
    score: u32,
    correct_count: u32,
    mode: Mode,
    feedback: Option<Feedback>,
    last_verdict: Option<Verdict>,
    multiplier: u32,
    started_at: Option<Instant>,
    result: Option<SessionResult>,
    sink: Box<dyn ProgressSink>,
}

impl ExerciseSession {
    pub fn new(sink: Box<dyn ProgressSink>) -> Self {
        Self {
            tasks: Vec::new(),
            current: 0,
            score: 0,
            correct_count: 0,
            mode: Mode::NotStarted,
            feedback: None,
            last_verdict: None,
            multiplier: SUBMIT_MULTIPLIER,
            started_at: None,
            result: None,
            sink,
        }
    }

    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier.max(1);
        self
    }

    pub fn start(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        for task in &mut self.tasks {
            task.reset();
        }
        self.current = 0;
        self.score = 0;
        self.correct_count = 0;
        self.feedback = None;
        self.last_verdict = None;
        self.result = None;
        self.started_at = Some(Instant::now());

        if self.tasks.is_empty() {
            info!("exercise started with no tasks");
            self.mode = Mode::Summary;
            self.result = Some(self.build_result(FinishReason::Completed));
            return;
        }

        self.mode = Mode::Practicing;
        info!(
            tasks = self.tasks.len(),
            kind = self.task_kind().as_str(),
            "exercise started"
        );
    }

    pub fn restart(&mut self) {
        let tasks = std::mem::take(&mut self.tasks);
        self.start(tasks);
    }

    /// Grade the current task, bank its points and move on.
    /// Ignored unless the learner is practicing.
    pub fn submit_answer(&mut self, selected: Option<&str>) -> Option<Verdict> {
        if self.mode != Mode::Practicing {
            return None;
        }
        let multiplier = self.multiplier;
        let task = self.tasks.get_mut(self.current)?;

        let correct = grader::is_answer_correct(task, selected);
        task.task_status = correct;
        let points = scoring::task_points(task.kind, correct, multiplier);
        self.feedback = Some(if correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect {
                correct_answer: task.correct_answer.clone(),
            }
        });

        if correct {
            self.correct_count = self.correct_count.saturating_add(1);
        }
        self.score = self.score.saturating_add(points);

        let verdict = Verdict {
            task_index: self.current,
            correct,
            points,
        };
        self.last_verdict = Some(verdict);
        debug!(task = self.current, correct, points, score = self.score, "answer submitted");

        self.advance();
        Some(verdict)
    }

    /// Move to the next task, or to the summary after the last one.
    pub fn advance(&mut self) {
        if self.mode != Mode::Practicing {
            return;
        }
        if self.current + 1 < self.tasks.len() {
            self.current += 1;
            self.tasks[self.current].reset();
            self.feedback = None;
        } else {
            self.finish(FinishReason::Completed);
        }
    }

    pub fn skip(&mut self) {
        if self.mode == Mode::Practicing {
            debug!(task = self.current, "task skipped");
        }
        self.advance();
    }

    /// Open a task for review without touching its working text.
    pub fn jump_to_task(&mut self, index: usize) -> bool {
        if index >= self.tasks.len() {
            debug!(index, total = self.tasks.len(), "review jump out of range");
            self.feedback = Some(Feedback::InvalidTaskIndex { index });
            return false;
        }
        self.current = index;
        self.feedback = None;
        self.mode = Mode::Reviewing;
        true
    }

    /// Leave review mode back to the summary of a finished run.
    pub fn close_review(&mut self) -> bool {
        if self.mode == Mode::Reviewing && self.result.is_some() {
            self.mode = Mode::Summary;
            return true;
        }
        false
    }

    /// Timer ran out. Whichever of this and the final answer reaches the
    /// summary first wins; the other becomes a no-op.
    pub fn time_expired(&mut self) -> bool {
        if matches!(self.mode, Mode::NotStarted | Mode::Summary) || self.result.is_some() {
            return false;
        }
        self.finish(FinishReason::TimeExpired);
        true
    }

    pub fn select_gap(&mut self, space_index: usize) -> bool {
        match self.editable_task() {
            Some(task) => task.highlights.select(space_index),
            None => false,
        }
    }

    pub fn insert_mark(&mut self, mark: &str) -> EditOutcome {
        match self.editable_task() {
            Some(task) => editor::insert_mark(task, mark),
            None => EditOutcome::Unchanged,
        }
    }

    pub fn delete_mark(&mut self) -> EditOutcome {
        match self.editable_task() {
            Some(task) => editor::delete_mark(task),
            None => EditOutcome::Unchanged,
        }
    }

    fn editable_task(&mut self) -> Option<&mut Task> {
        if self.mode != Mode::Practicing {
            return None;
        }
        self.tasks
            .get_mut(self.current)
            .filter(|task| task.kind.is_editable())
    }

    fn finish(&mut self, reason: FinishReason) {
        self.mode = Mode::Summary;
        let result = self.build_result(reason);
        self.result = Some(result.clone());
        info!(
            score = result.score,
            correct = result.correct_count,
            total = result.total_tasks,
            reason = ?reason,
            "exercise finished"
        );
        self.hand_off(&result);
    }

    /// Report the finished run. The summary is already showing; a failing
    /// sink is logged and otherwise ignored. This runs on the caller's
    /// thread, so sinks that touch the disk belong behind a `BackgroundSink`.
    fn hand_off(&mut self, result: &SessionResult) {
        match self.sink.current_user() {
            Identity::Guest => debug!("guest session, progress not recorded"),
            Identity::Learner { name } => {
                if let Err(err) = self.sink.record_session_result(result) {
                    error!(learner = %name, error = %err, "failed to record session result");
                }
            }
        }
    }

    fn build_result(&self, finish_reason: FinishReason) -> SessionResult {
        SessionResult {
            score: self.score,
            correct_count: self.correct_count,
            total_tasks: self.tasks.len() as u32,
            task_kind: self.task_kind(),
            elapsed_secs: self
                .started_at
                .map(|s| s.elapsed().as_secs_f64())
                .unwrap_or(0.0),
            finish_reason,
            timestamp: Utc::now(),
            learner: match self.sink.current_user() {
                Identity::Learner { name } => Some(name),
                Identity::Guest => None,
            },
        }
    }

    /// Kind of the run, taken from its first task.
    pub fn task_kind(&self) -> TaskKind {
        self.tasks
            .first()
            .map(|t| t.kind)
            .unwrap_or(TaskKind::Generic)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_last_task(&self) -> bool {
        self.current + 1 >= self.tasks.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last_verdict
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Completed,
    TimeExpired,
}

/// What the progress sink receives when an exercise reaches its summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub score: u32,
    pub correct_count: u32,
    pub total_tasks: u32,
    pub task_kind: TaskKind,
    pub elapsed_secs: f64,
    #[serde(default = "default_finish_reason")]
    pub finish_reason: FinishReason,
    pub timestamp: DateTime<Utc>,
    /// Who ran the session; absent for guests and older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learner: Option<String>,
}

fn default_finish_reason() -> FinishReason {
    FinishReason::Completed
}

impl SessionResult {
    pub fn accuracy(&self) -> f64 {
        crate::engine::scoring::accuracy(self.correct_count, self.total_tasks)
    }
}

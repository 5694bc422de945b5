use rust_embed::Embed;
use tracing::error;

use crate::task::upload::parse_tasks;
use crate::task::{Task, TaskKind};

#[derive(Embed)]
#[folder = "assets/tasks/"]
struct TaskAssets;

/// Built-in exercises for `kind`. Generic tasks ship no defaults.
pub fn default_tasks(kind: TaskKind) -> Vec<Task> {
    let filename = format!("{}.json", kind.as_str());
    let Some(file) = TaskAssets::get(&filename) else {
        return Vec::new();
    };
    let Ok(content) = std::str::from_utf8(file.data.as_ref()) else {
        error!(file = %filename, "bundled task pack is not UTF-8");
        return Vec::new();
    };
    match parse_tasks(content, kind) {
        Ok(tasks) => tasks,
        Err(err) => {
            error!(file = %filename, error = %err, "bundled task pack is invalid");
            Vec::new()
        }
    }
}

pub fn bundled_kinds() -> Vec<TaskKind> {
    [TaskKind::Punctuation, TaskKind::Spelling, TaskKind::Generic]
        .into_iter()
        .filter(|k| TaskAssets::get(&format!("{}.json", k.as_str())).is_some())
        .collect()
}

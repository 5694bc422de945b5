use std::path::PathBuf;

use crate::task::defaults::default_tasks;
use crate::task::upload::{TaskUploadError, load_file};
use crate::task::{Task, TaskKind};

/// Where a session's exercises come from.
pub trait TaskSource {
    /// Short human-readable origin, shown in the header and logs.
    fn describe(&self) -> String;

    fn load(&self, kind: TaskKind) -> Result<Vec<Task>, TaskUploadError>;
}

/// Exercises compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct BundledTasks;

impl TaskSource for BundledTasks {
    fn describe(&self) -> String {
        "bundled".to_string()
    }

    fn load(&self, kind: TaskKind) -> Result<Vec<Task>, TaskUploadError> {
        Ok(default_tasks(kind))
    }
}

/// A task file uploaded from disk.
#[derive(Clone, Debug)]
pub struct FileTasks {
    path: PathBuf,
}

impl FileTasks {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TaskSource for FileTasks {
    fn describe(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn load(&self, kind: TaskKind) -> Result<Vec<Task>, TaskUploadError> {
        load_file(&self.path, kind)
    }
}

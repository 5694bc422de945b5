//! Task packs fetched over HTTP, with the last good copy kept on disk so a
//! pack stays usable offline.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::task::source::TaskSource;
use crate::task::upload::{TaskUploadError, parse_tasks};
use crate::task::{Task, TaskKind};

pub struct TaskCache {
    base_dir: PathBuf,
}

impl TaskCache {
    pub fn new() -> Option<Self> {
        let base = dirs::data_dir()?.join("skyryba").join("downloads");
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Option<Self> {
        fs::create_dir_all(&base_dir).ok()?;
        Some(Self { base_dir })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let path = self.base_dir.join(Self::sanitize_key(key));
        fs::read_to_string(path).ok()
    }

    pub fn put(&self, key: &str, content: &str) -> bool {
        let path = self.base_dir.join(Self::sanitize_key(key));
        fs::write(path, content).is_ok()
    }

    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str) -> Result<String, TaskUploadError> {
    let fail = |reason: String| TaskUploadError::Fetch {
        url: url.to_string(),
        reason,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|e| fail(e.to_string()))?;
    let response = client.get(url).send().map_err(|e| fail(e.to_string()))?;
    if !response.status().is_success() {
        return Err(fail(format!("HTTP {}", response.status())));
    }
    response.text().map_err(|e| fail(e.to_string()))
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(url: &str) -> Result<String, TaskUploadError> {
    Err(TaskUploadError::Fetch {
        url: url.to_string(),
        reason: "built without network support".to_string(),
    })
}

/// A task pack published at a URL.
pub struct RemoteTasks {
    url: String,
    cache: Option<TaskCache>,
}

impl RemoteTasks {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cache: TaskCache::new(),
        }
    }

    pub fn with_cache(url: impl Into<String>, cache: TaskCache) -> Self {
        Self {
            url: url.into(),
            cache: Some(cache),
        }
    }

    fn cache_key(&self, kind: TaskKind) -> String {
        format!("{}-{}", kind.as_str(), self.url)
    }
}

impl TaskSource for RemoteTasks {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn load(&self, kind: TaskKind) -> Result<Vec<Task>, TaskUploadError> {
        let key = self.cache_key(kind);
        match fetch_url(&self.url) {
            Ok(body) => {
                let tasks = parse_tasks(&body, kind)?;
                if let Some(cache) = &self.cache
                    && !cache.put(&key, &body)
                {
                    warn!(url = %self.url, "could not cache downloaded tasks");
                }
                info!(url = %self.url, count = tasks.len(), "downloaded tasks");
                Ok(tasks)
            }
            Err(err) => {
                let Some(body) = self.cache.as_ref().and_then(|c| c.get(&key)) else {
                    return Err(err);
                };
                warn!(url = %self.url, error = %err, "using cached copy of task pack");
                parse_tasks(&body, kind)
            }
        }
    }
}

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_LOCALE: &str = "lt";
pub const MIN_TASK_SECONDS: u64 = 10;
pub const MAX_TASK_SECONDS: u64 = 3600;
pub const MAX_SCORE_MULTIPLIER: u32 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Learner whose progress is saved. `None` plays as a guest.
    #[serde(default)]
    pub learner_name: Option<String>,
    /// Per-task countdown; 0 turns the timer off.
    #[serde(default = "default_seconds_per_task")]
    pub seconds_per_task: u64,
    #[serde(default)]
    pub shuffle_tasks: bool,
    /// 0 means every task in the pack.
    #[serde(default)]
    pub tasks_per_session: usize,
    #[serde(default = "default_score_multiplier")]
    pub score_multiplier: u32,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}
fn default_theme() -> String {
    "default".to_string()
}
fn default_seconds_per_task() -> u64 {
    60
}
fn default_score_multiplier() -> u32 {
    crate::engine::scoring::SUBMIT_MULTIPLIER
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            theme: default_theme(),
            learner_name: None,
            seconds_per_task: default_seconds_per_task(),
            shuffle_tasks: false,
            tasks_per_session: 0,
            score_multiplier: default_score_multiplier(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skyryba")
            .join("config.toml")
    }

    /// Pull out-of-range values back into bounds. Call after loading and
    /// after applying command-line overrides.
    pub fn validate(&mut self, available_locales: &[&str]) {
        if !available_locales.contains(&self.locale.as_str()) {
            warn!(locale = %self.locale, "unknown locale, using {DEFAULT_LOCALE}");
            self.locale = default_locale();
        }
        if self.seconds_per_task != 0 {
            self.seconds_per_task = self
                .seconds_per_task
                .clamp(MIN_TASK_SECONDS, MAX_TASK_SECONDS);
        }
        self.score_multiplier = self.score_multiplier.clamp(1, MAX_SCORE_MULTIPLIER);
        if self
            .learner_name
            .as_deref()
            .is_some_and(|n| n.trim().is_empty())
        {
            self.learner_name = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALES: [&str; 2] = ["en", "lt"];

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.locale, "lt");
        assert_eq!(config.seconds_per_task, 60);
        assert_eq!(config.score_multiplier, 2);
        assert_eq!(config.tasks_per_session, 0);
        assert!(!config.shuffle_tasks);
        assert!(config.learner_name.is_none());
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
locale = "en"
learner_name = "Ona"
shuffle_tasks = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.locale, "en");
        assert_eq!(config.learner_name.as_deref(), Some("Ona"));
        assert!(config.shuffle_tasks);
        assert_eq!(config.theme, "default");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            learner_name: Some("Jonas".to_string()),
            tasks_per_session: 5,
            ..Config::default()
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.learner_name, config.learner_name);
        assert_eq!(deserialized.tasks_per_session, 5);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config {
            seconds_per_task: 3,
            score_multiplier: 0,
            ..Config::default()
        };
        config.validate(&LOCALES);
        assert_eq!(config.seconds_per_task, MIN_TASK_SECONDS);
        assert_eq!(config.score_multiplier, 1);

        config.seconds_per_task = 99_999;
        config.score_multiplier = 50;
        config.validate(&LOCALES);
        assert_eq!(config.seconds_per_task, MAX_TASK_SECONDS);
        assert_eq!(config.score_multiplier, MAX_SCORE_MULTIPLIER);
    }

    #[test]
    fn test_validate_keeps_disabled_timer() {
        let mut config = Config {
            seconds_per_task: 0,
            ..Config::default()
        };
        config.validate(&LOCALES);
        assert_eq!(config.seconds_per_task, 0);
    }

    #[test]
    fn test_validate_unknown_locale_and_blank_name() {
        let mut config = Config {
            locale: "de".to_string(),
            learner_name: Some("  ".to_string()),
            ..Config::default()
        };
        config.validate(&LOCALES);
        assert_eq!(config.locale, "lt");
        assert!(config.learner_name.is_none());
    }
}

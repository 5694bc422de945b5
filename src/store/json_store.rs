use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::session::result::SessionResult;
use crate::store::schema::{ProfileBook, ProfileData, SessionHistoryData};

const PROFILES_FILE: &str = "profiles.json";
const HISTORY_FILE: &str = "history.json";

#[derive(Clone, Debug)]
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skyryba");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                warn!(file = name, error = %err, "unreadable store file, starting fresh");
                T::default()
            }),
            Err(_) => T::default(),
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load every learner's profile. A missing, corrupt or outdated file
    /// yields an empty book.
    pub fn load_profiles(&self) -> ProfileBook {
        let book: ProfileBook = self.load(PROFILES_FILE);
        if book.needs_reset() {
            warn!(
                found = book.schema_version,
                "profile schema changed, starting fresh"
            );
            return ProfileBook::default();
        }
        book
    }

    pub fn save_profiles(&self, book: &ProfileBook) -> Result<()> {
        self.save(PROFILES_FILE, book)
    }

    /// Profile of one learner; fresh if they have never practiced.
    pub fn load_profile(&self, learner: &str) -> ProfileData {
        self.load_profiles().profile(learner)
    }

    pub fn load_history(&self) -> SessionHistoryData {
        self.load(HISTORY_FILE)
    }

    pub fn save_history(&self, data: &SessionHistoryData) -> Result<()> {
        self.save(HISTORY_FILE, data)
    }

    /// Persist one finished session for `learner`: totals, streak, high
    /// score and history entry. Returns the updated profile.
    pub fn record_session(
        &self,
        learner: &str,
        result: &SessionResult,
        today: NaiveDate,
    ) -> Result<ProfileData> {
        let mut book = self.load_profiles();
        let profile = book.profile_mut(learner);
        if profile.absorb(result, today) {
            debug!(learner, high_score = profile.high_score, "new high score");
        }
        let profile = profile.clone();
        self.save_profiles(&book)?;

        let mut history = self.load_history();
        history.push(SessionResult {
            learner: Some(learner.to_string()),
            ..result.clone()
        });
        self.save_history(&history)?;
        Ok(profile)
    }

    pub fn record_session_today(&self, learner: &str, result: &SessionResult) -> Result<ProfileData> {
        self.record_session(learner, result, Utc::now().date_naive())
    }
}

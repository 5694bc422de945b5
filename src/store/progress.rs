use anyhow::Result;
use tracing::info;

use crate::session::result::SessionResult;
use crate::session::sink::{Identity, ProgressSink};
use crate::store::json_store::JsonStore;

/// Progress sink backed by the JSON store.
pub struct StoreSink {
    store: JsonStore,
    identity: Identity,
}

impl StoreSink {
    pub fn new(store: JsonStore, identity: Identity) -> Self {
        Self { store, identity }
    }
}

impl ProgressSink for StoreSink {
    fn current_user(&self) -> Identity {
        self.identity.clone()
    }

    fn record_session_result(&mut self, result: &SessionResult) -> Result<()> {
        let Identity::Learner { name } = &self.identity else {
            return Ok(());
        };
        let profile = self.store.record_session_today(name, result)?;
        info!(
            learner = %name,
            score = result.score,
            high_score = profile.high_score,
            streak = profile.streak_days,
            "progress saved"
        );
        Ok(())
    }
}

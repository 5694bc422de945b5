use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use anyhow::{Result, anyhow};
use tracing::error;

use crate::session::result::SessionResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    Guest,
    Learner { name: String },
}

impl Identity {
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some(n) if !n.is_empty() => Identity::Learner {
                name: n.to_string(),
            },
            _ => Identity::Guest,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Identity::Guest)
    }
}

/// Where finished exercises are reported. Only consulted once per run, when
/// the session enters its summary, and never for guests.
pub trait ProgressSink: Send {
    fn current_user(&self) -> Identity;
    fn record_session_result(&mut self, result: &SessionResult) -> Result<()>;
}

/// Sink that forgets everything; used when nothing should be persisted.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn current_user(&self) -> Identity {
        Identity::Guest
    }

    fn record_session_result(&mut self, _result: &SessionResult) -> Result<()> {
        Ok(())
    }
}

/// Runs another sink on a worker thread so a slow disk never delays the
/// summary. Every result the worker has handled is sent back on the receiver
/// returned by `spawn`. Dropping the sink waits for pending writes.
pub struct BackgroundSink {
    identity: Identity,
    tx: Option<mpsc::Sender<SessionResult>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundSink {
    pub fn spawn<S: ProgressSink + 'static>(mut inner: S) -> (Self, mpsc::Receiver<SessionResult>) {
        let identity = inner.current_user();
        let (tx, rx) = mpsc::channel::<SessionResult>();
        let (done_tx, done_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            for result in rx {
                if let Err(err) = inner.record_session_result(&result) {
                    error!(error = %err, "background progress write failed");
                }
                // The receiving side may already be gone during shutdown.
                let _ = done_tx.send(result);
            }
        });

        let sink = Self {
            identity,
            tx: Some(tx),
            worker: Some(worker),
        };
        (sink, done_rx)
    }
}

impl ProgressSink for BackgroundSink {
    fn current_user(&self) -> Identity {
        self.identity.clone()
    }

    fn record_session_result(&mut self, result: &SessionResult) -> Result<()> {
        self.tx
            .as_ref()
            .ok_or_else(|| anyhow!("progress worker stopped"))?
            .send(result.clone())
            .map_err(|_| anyhow!("progress worker stopped"))
    }
}

impl Drop for BackgroundSink {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            error!("progress worker panicked");
        }
    }
}

#![warn(clippy::all, clippy::pedantic)]

use log::{debug, warn};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{Bookmark, BookmarkRepository};

/// Records bookmark usage in the background
///
/// [`UsageTracker::record`] only queues the bookmark; a worker task applies
/// the increments one after another. A failed increment is logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct UsageTracker {
    sender: mpsc::UnboundedSender<Bookmark>,
    worker: JoinHandle<usize>,
}

impl UsageTracker {
    /// Start the worker on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(repository: Arc<dyn BookmarkRepository>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Bookmark>();

        let worker = tokio::spawn(async move {
            let mut applied = 0;
            while let Some(bookmark) = receiver.recv().await {
                match repository.increment_usage(&bookmark).await {
                    Ok(()) => {
                        applied += 1;
                        debug!("Recorded use of '{}'", bookmark.name);
                    }
                    Err(e) => warn!("Failed to record use of '{}': {e}", bookmark.name),
                }
            }
            applied
        });

        Self { sender, worker }
    }

    /// Queue a usage increment without waiting for it
    pub fn record(&self, bookmark: Bookmark) {
        if let Err(e) = self.sender.send(bookmark) {
            warn!("Usage tracker stopped, dropping use of '{}'", e.0.name);
        }
    }

    /// Stop accepting increments and wait for the queued ones.
    ///
    /// Returns how many increments succeeded over the tracker's lifetime.
    pub async fn shutdown(self) -> usize {
        drop(self.sender);
        match self.worker.await {
            Ok(applied) => applied,
            Err(e) => {
                warn!("Usage tracker worker failed: {e}");
                0
            }
        }
    }
}

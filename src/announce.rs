//! Announcement dispatch: play a clip for a name, synthesizing one if missing
//!
//! The dispatcher owns the in-process known-names cache. A name is either
//! absent (nothing known), `Synthesizing` (a background synthesis task is in
//! flight) or `Ready` (a clip is confirmed on disk). The cache is never
//! persisted; existing clips are re-detected from the filesystem after a
//! restart.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clips::ClipStore;
use crate::voice::{Synthesizer, VoiceSession};

/// Synthesis status of a known name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipState {
    /// A background synthesis task is producing the clip
    Synthesizing,
    /// The clip is confirmed to exist on disk
    Ready,
}

/// Decides whether to synthesize, then plays the clip for a name
pub struct Dispatcher {
    store: ClipStore,
    synth: Arc<dyn Synthesizer>,
    names: Mutex<HashMap<String, ClipState>>,
}

impl Dispatcher {
    /// Create a dispatcher over a clip store and a synthesis backend
    #[must_use]
    pub fn new(store: ClipStore, synth: Arc<dyn Synthesizer>) -> Self {
        Self {
            store,
            synth,
            names: Mutex::new(HashMap::new()),
        }
    }

    /// Announce a display name on the given voice session
    ///
    /// Ensures a clip exists or is being synthesized, then issues playback
    /// of the conventional path without waiting for synthesis to finish. A
    /// first playback racing an in-flight synthesis may fail; playback
    /// errors are logged and never propagated.
    pub async fn announce(self: &Arc<Self>, name: &str, session: &dyn VoiceSession) {
        self.ensure_clip(name).await;

        let path = self.store.clip_path(name);
        match session.play(&path).await {
            Ok(()) => tracing::info!(name, path = %path.display(), "announcement started"),
            Err(e) => tracing::warn!(name, error = %e, "announcement playback failed"),
        }
    }

    /// Current cache state for a name, if any
    pub async fn clip_state(&self, name: &str) -> Option<ClipState> {
        self.names.lock().await.get(name).copied()
    }

    /// Make sure a clip exists for `name` or a synthesis task is running
    ///
    /// A second call for the same name while synthesis is pending finds the
    /// `Synthesizing` entry and does nothing, so a name is synthesized at
    /// most once per attempt. Failed synthesis removes the entry again so a
    /// later announce retries.
    async fn ensure_clip(self: &Arc<Self>, name: &str) {
        let mut names = self.names.lock().await;
        if names.contains_key(name) {
            return;
        }

        if self.store.contains(name) {
            names.insert(name.to_string(), ClipState::Ready);
            return;
        }

        tracing::debug!(name, "no clip on disk, synthesizing");
        names.insert(name.to_string(), ClipState::Synthesizing);
        drop(names);

        let this = Arc::clone(self);
        let name = name.to_string();
        tokio::spawn(async move {
            let dest = this.store.clip_path(&name);
            match this.synth.synthesize(&name, &dest).await {
                Ok(()) => {
                    this.names
                        .lock()
                        .await
                        .insert(name.clone(), ClipState::Ready);
                    tracing::info!(%name, path = %dest.display(), "clip synthesized");
                }
                Err(e) => {
                    this.names.lock().await.remove(&name);
                    tracing::warn!(%name, error = %e, "clip synthesis failed");
                }
            }
        });
    }
}

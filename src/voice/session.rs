//! Playback into the active Discord voice connection

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use songbird::events::{Event, EventContext, TrackEvent};
use songbird::tracks::PlayMode;
use tokio::sync::Mutex;

use crate::{Error, Result};

/// A handle to the channel the bot is currently connected to
#[async_trait]
pub trait VoiceSession: Send + Sync {
    /// Issue playback of an audio file on this session
    ///
    /// Returns once playback has been queued; completion and errors are
    /// reported through track events, not through this call.
    async fn play(&self, path: &Path) -> Result<()>;
}

/// Voice session backed by a songbird call
pub struct SongbirdSession {
    call: Arc<Mutex<songbird::Call>>,
}

impl SongbirdSession {
    /// Wrap a songbird call obtained from a join
    #[must_use]
    pub const fn new(call: Arc<Mutex<songbird::Call>>) -> Self {
        Self { call }
    }
}

#[async_trait]
impl VoiceSession for SongbirdSession {
    async fn play(&self, path: &Path) -> Result<()> {
        let clip = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());

        let input = songbird::input::File::new(path.to_path_buf());

        let mut call = self.call.lock().await;
        let handle = call.play_input(input.into());

        // The handle is dropped at the end of this scope; track lifecycle
        // is observed through the registered events.
        for event in [TrackEvent::Play, TrackEvent::End, TrackEvent::Error] {
            handle
                .add_event(Event::Track(event), TrackWatcher { clip: clip.clone() })
                .map_err(|e| Error::Voice(format!("failed to attach track event: {e}")))?;
        }

        Ok(())
    }
}

/// Logs track lifecycle; errors are recorded, never propagated
struct TrackWatcher {
    clip: String,
}

#[async_trait]
impl songbird::EventHandler for TrackWatcher {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(track_list) = ctx {
            for (state, _handle) in *track_list {
                match &state.playing {
                    PlayMode::Play => {
                        tracing::info!(clip = %self.clip, "playing announcement");
                    }
                    PlayMode::End | PlayMode::Stop => {
                        tracing::debug!(clip = %self.clip, "announcement finished");
                    }
                    PlayMode::Errored(e) => {
                        tracing::warn!(clip = %self.clip, error = %e, "announcement track error");
                    }
                    PlayMode::Pause => {}
                    _ => {}
                }
            }
        }
        None
    }
}

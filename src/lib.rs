//! Herald - a Discord voice-announcement bot
//!
//! When a user joins a voice channel, herald joins too and plays an
//! announcement clip naming them; names without a clip get one synthesized.
//! Clips are registered by uploading audio files in a submissions text
//! channel.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               Discord gateway                 │
//! │   voice-state events  │  message events      │
//! └───────────┬───────────────────┬──────────────┘
//!             │                   │
//! ┌───────────▼──────────┐ ┌──────▼──────────────┐
//! │  Membership Tracker  │ │   Upload Handler    │
//! │  join/leave decisions│ │   !newfile, !list   │
//! └───────────┬──────────┘ └──────┬──────────────┘
//!             │                   │
//! ┌───────────▼──────────────────▼───────────────┐
//! │   Announcement Dispatcher │ Clip Store        │
//! │   known-names cache, TTS fallback, playback   │
//! └──────────────────────────────────────────────┘
//! ```

pub mod announce;
pub mod clips;
pub mod config;
pub mod daemon;
pub mod error;
pub mod gateway;
pub mod presence;
pub mod uploads;
pub mod voice;

pub use announce::{ClipState, Dispatcher};
pub use clips::ClipStore;
pub use config::{Config, TtsBackend, TtsConfig};
pub use daemon::Daemon;
pub use error::{Error, Result};
pub use presence::{Decision, MemberInfo, MembershipTracker, Seat, VoiceTransition};
pub use uploads::{ClipUpload, UploadHandler};
pub use voice::{SongbirdSession, SpeechService, Synthesizer, VoiceSession};

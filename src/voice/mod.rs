//! Voice module
//!
//! Speech synthesis for missing clips and playback into the active
//! Discord voice connection.

mod session;
mod tts;

pub use session::{SongbirdSession, VoiceSession};
pub use tts::{SpeechService, Synthesizer};

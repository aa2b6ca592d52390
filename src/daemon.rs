//! Daemon - the announcement bot service
//!
//! Wires the clip store, dispatcher, tracker and upload handler into a
//! serenity client with songbird registered for voice.

use std::sync::Arc;

use serenity::all::GatewayIntents;
use serenity::Client;
use songbird::SerenityInit;

use crate::announce::Dispatcher;
use crate::clips::ClipStore;
use crate::gateway::Gateway;
use crate::uploads::UploadHandler;
use crate::voice::{SpeechService, Synthesizer};
use crate::{Config, Error, Result};

/// The herald daemon
pub struct Daemon {
    config: Config,
}

impl Daemon {
    /// Create a new daemon instance
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the bot until the gateway connection ends
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid, the clip directory cannot
    /// be created, or the client fails to authenticate/start
    pub async fn run(self) -> Result<()> {
        let store = ClipStore::open(&self.config.clip_dir)?;
        tracing::info!(dir = %store.dir().display(), "clip store opened");

        let synth: Arc<dyn Synthesizer> = Arc::new(SpeechService::from_config(&self.config.tts)?);
        let dispatcher = Arc::new(Dispatcher::new(store.clone(), synth));
        let uploads = UploadHandler::new(store.clone());
        let gateway = Gateway::new(
            dispatcher,
            uploads,
            store,
            self.config.submission_channel.clone(),
        );

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_VOICE_STATES
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = Client::builder(&self.config.token, intents)
            .event_handler(gateway)
            .register_songbird()
            .await
            .map_err(|e| Error::Discord(format!("failed to create client: {e}")))?;

        tracing::info!("herald ready, connecting to gateway");

        client
            .start()
            .await
            .map_err(|e| Error::Discord(format!("client error: {e}")))
    }
}

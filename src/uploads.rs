//! Clip uploads: the `!newfile` command in the submissions channel
//!
//! A submission is a command message with exactly one audio attachment. The
//! clip name comes from the command arguments, or is derived from the
//! attachment filename when no arguments are given. Accepted uploads are
//! streamed into the clip store under the conventional `.wav` destination
//! name; the bytes are stored as uploaded, not transcoded.

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::clips::{ClipStore, derive_clip_name};

/// Attachment extensions accepted for clip submissions
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["wav", "m4a", "mp3", "ogg"];

/// An attachment on a submission message
#[derive(Debug, Clone)]
pub struct ClipUpload {
    /// Download URL for the attachment bytes
    pub url: String,
    /// Original attachment filename
    pub filename: String,
}

/// Handles clip submission commands
pub struct UploadHandler {
    store: ClipStore,
    client: reqwest::Client,
}

impl UploadHandler {
    /// Create an upload handler writing into the given store
    #[must_use]
    pub fn new(store: ClipStore) -> Self {
        Self {
            store,
            client: reqwest::Client::new(),
        }
    }

    /// Handle a `!newfile` invocation; returns the reply to post
    ///
    /// Every outcome produces a user-visible reply: a usage message when no
    /// attachment is present, a rejection listing supported types for a bad
    /// extension, an error note when the download fails, and a confirmation
    /// on success.
    pub async fn handle(&self, args: &str, attachment: Option<&ClipUpload>) -> String {
        let Some(upload) = attachment else {
            return usage_reply();
        };

        let Some(extension) = file_extension(&upload.filename) else {
            return rejection_reply();
        };
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return rejection_reply();
        }

        let name = match args.trim() {
            "" => derive_clip_name(&upload.filename),
            explicit => explicit.to_string(),
        };

        match self.download_to_store(&name, &upload.url).await {
            Ok(()) => format!("Registered announcement clip `{name}`"),
            Err(e) => {
                tracing::error!(name, url = %upload.url, error = %e, "failed to store uploaded clip");
                "Error downloading attachment".to_string()
            }
        }
    }

    /// Stream the attachment bytes into the clip store
    async fn download_to_store(&self, name: &str, url: &str) -> crate::Result<()> {
        let url = url::Url::parse(url)
            .map_err(|e| crate::Error::Upload(format!("bad attachment url: {e}")))?;
        let response = self.client.get(url).send().await?.error_for_status()?;

        let (path, mut file) = self.store.create(name).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;

        tracing::info!(name, path = %path.display(), "stored uploaded clip");
        Ok(())
    }
}

/// Usage message for a malformed submission
fn usage_reply() -> String {
    "Please attach an audio file: `!newfile [name]` with one attachment".to_string()
}

/// Rejection message listing the supported attachment types
fn rejection_reply() -> String {
    format!(
        "Unsupported file type, supported types are: {}",
        SUPPORTED_EXTENSIONS.join(", ")
    )
}

/// Lowercased extension of a filename, if it has one
fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

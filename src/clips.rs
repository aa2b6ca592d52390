//! Clip store: announcement audio files keyed by display name
//!
//! A clip lives at `<dir>/<sanitized name>.wav`. The `.wav` suffix is the
//! path convention for every clip regardless of how it was produced; the
//! encoding inside is whatever was uploaded or synthesized.

use std::path::{Path, PathBuf};

use crate::Result;

/// Extension every stored clip is addressed by
pub const CLIP_EXTENSION: &str = "wav";

/// Stem used when sanitization leaves nothing of a name
const FALLBACK_STEM: &str = "unknown";

/// Directory of announcement clips, one file per display name
#[derive(Debug, Clone)]
pub struct ClipStore {
    dir: PathBuf,
}

impl ClipStore {
    /// Open a clip store, creating the directory if missing
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory backing this store
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Conventional path for a display name's clip
    #[must_use]
    pub fn clip_path(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{CLIP_EXTENSION}", sanitize_name(name)))
    }

    /// Whether a clip exists for this name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.clip_path(name).is_file()
    }

    /// Create (or truncate) the clip file for a name, for streamed writes
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created
    pub async fn create(&self, name: &str) -> Result<(PathBuf, tokio::fs::File)> {
        let path = self.clip_path(name);
        let file = tokio::fs::File::create(&path).await?;
        Ok((path, file))
    }

    /// Sorted list of registered clip names
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == CLIP_EXTENSION) {
                    path.file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        names
    }
}

/// Sanitize an untrusted display name into a safe file stem
///
/// Path separators, NUL and other control characters are dropped, and
/// leading dots are stripped so a name can never escape the clip directory
/// or hide as a dotfile.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\'))
        .collect();

    let trimmed = cleaned.trim().trim_start_matches('.').trim_start();
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Derive a clip name from an uploaded filename
///
/// Strips any path prefix, replaces underscores with spaces and drops the
/// trailing extension: `sounds/my_clip.mp3` becomes `my clip`.
#[must_use]
pub fn derive_clip_name(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let stem = match base.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => base,
    };

    stem.replace('_', " ")
}

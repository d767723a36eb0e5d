//! Media adapter contract.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Kind of element a player wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
    Iframe,
}

impl MediaKind {
    /// Map a tag name to a supported kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "audio" => Some(MediaKind::Audio),
            "video" => Some(MediaKind::Video),
            "iframe" => Some(MediaKind::Iframe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Iframe => "iframe",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One playable file in a source list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaFile {
    pub url: String,
    /// MIME type from a `type` attribute, if given.
    pub mime: Option<String>,
}

impl MediaFile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mime: None,
        }
    }

    pub fn with_mime(url: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mime: Some(mime.into()),
        }
    }

    /// MIME type, falling back to a guess from the file extension.
    pub fn mime_type(&self) -> Option<String> {
        if let Some(mime) = &self.mime {
            return Some(mime.clone());
        }
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        let mime = match ext.as_str() {
            "mp4" | "m4v" => "video/mp4",
            "webm" => "video/webm",
            "ogv" => "video/ogg",
            "mov" => "video/quicktime",
            "mp3" => "audio/mpeg",
            "ogg" | "oga" => "audio/ogg",
            "wav" => "audio/wav",
            "aac" | "m4a" => "audio/aac",
            _ => return None,
        };
        Some(mime.to_string())
    }
}

/// Wraps one playable element and owns its transport.
///
/// Calls made before loading completes must be safe: adapters queue
/// `play()` until ready. Calls after `destroy()` are no-ops or return
/// [`MediaError::Destroyed`].
pub trait MediaAdapter: Send + Sync + fmt::Debug {
    fn kind(&self) -> MediaKind;

    /// Start loading the current file list.
    fn load(&mut self) -> Result<(), MediaError>;

    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self) -> Result<(), MediaError>;

    /// The element can play through. Starts a queued `play()`.
    fn mark_ready(&mut self);

    /// The element reported a load error. Drops any queued `play()`.
    fn fail(&mut self, error: MediaError);

    /// Release the resource. Idempotent.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;

    fn is_paused(&self) -> bool;

    /// Drop the internal file list.
    fn clear_files(&mut self);

    /// Replace the file list. Validation happens on the next `load()`.
    fn set_files(&mut self, files: Vec<MediaFile>);

    fn files(&self) -> &[MediaFile];
}

/// Media adapter shared between a player and the ad break bound to it.
pub type SharedMedia = Arc<RwLock<dyn MediaAdapter>>;

/// Wrap an adapter in a [`SharedMedia`] handle.
pub fn shared<M: MediaAdapter + 'static>(media: M) -> SharedMedia {
    Arc::new(RwLock::new(media))
}

/// Media error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("Network error")]
    Network,

    #[error("Source not supported")]
    SrcNotSupported,

    #[error("No source to load")]
    NoSource,

    #[error("Not ready")]
    NotReady,

    #[error("Invalid ad URL: {0}")]
    InvalidAdUrl(String),

    #[error("Media adapter destroyed")]
    Destroyed,
}

impl MediaError {
    /// HTMLMediaElement `MediaError.code`, 0 for errors without one.
    pub fn code(&self) -> u16 {
        match self {
            MediaError::Network => 2,
            MediaError::SrcNotSupported | MediaError::NoSource => 4,
            MediaError::NotReady | MediaError::InvalidAdUrl(_) | MediaError::Destroyed => 0,
        }
    }
}

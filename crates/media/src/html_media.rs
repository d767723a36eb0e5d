//! Adapter over native `<audio>` and `<video>` elements.

use crate::adapter::{MediaAdapter, MediaError, MediaFile, MediaKind};

/// Media ready state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaReadyState {
    /// No information about media.
    HaveNothing = 0,
    /// Metadata available.
    HaveMetadata = 1,
    /// Current frame available.
    HaveCurrentData = 2,
    /// Future data available.
    HaveFutureData = 3,
    /// Enough data for playback.
    HaveEnoughData = 4,
}

/// Media network state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaNetworkState {
    /// Not initialized.
    Empty = 0,
    /// Idle (no activity).
    Idle = 1,
    /// Loading.
    Loading = 2,
    /// No source found.
    NoSource = 3,
}

/// Can play type result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanPlayType {
    Empty,
    Maybe,
    Probably,
}

impl CanPlayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanPlayType::Empty => "",
            CanPlayType::Maybe => "maybe",
            CanPlayType::Probably => "probably",
        }
    }
}

/// Adapter for an audio or video element.
#[derive(Debug)]
pub struct HtmlMediaAdapter {
    kind: MediaKind,
    files: Vec<MediaFile>,
    current_src: Option<String>,
    network_state: MediaNetworkState,
    ready_state: MediaReadyState,
    paused: bool,
    /// `play()` arrived before the resource was ready.
    play_pending: bool,
    error: Option<MediaError>,
    destroyed: bool,
}

impl HtmlMediaAdapter {
    pub fn new(kind: MediaKind, files: Vec<MediaFile>) -> Self {
        Self {
            kind,
            files,
            current_src: None,
            network_state: MediaNetworkState::Empty,
            ready_state: MediaReadyState::HaveNothing,
            paused: true,
            play_pending: false,
            error: None,
            destroyed: false,
        }
    }

    pub fn audio(files: Vec<MediaFile>) -> Self {
        Self::new(MediaKind::Audio, files)
    }

    pub fn video(files: Vec<MediaFile>) -> Self {
        Self::new(MediaKind::Video, files)
    }

    /// Check if media can play a type.
    pub fn can_play_type(&self, mime_type: &str) -> CanPlayType {
        let essence = mime_type.split(';').next().unwrap_or_default().trim();
        match essence {
            "video/mp4" | "video/webm" | "video/ogg" => CanPlayType::Probably,
            "audio/mpeg" | "audio/ogg" | "audio/wav" | "audio/webm" => CanPlayType::Probably,
            "video/quicktime" | "audio/aac" => CanPlayType::Maybe,
            _ => CanPlayType::Empty,
        }
    }

    pub fn current_src(&self) -> Option<&str> {
        self.current_src.as_deref()
    }

    pub fn network_state(&self) -> MediaNetworkState {
        self.network_state
    }

    pub fn ready_state(&self) -> MediaReadyState {
        self.ready_state
    }

    pub fn error(&self) -> Option<&MediaError> {
        self.error.as_ref()
    }

    /// Whether a `play()` is queued behind loading.
    pub fn play_pending(&self) -> bool {
        self.play_pending
    }

    /// First file whose type is playable. Files with an unknown type are
    /// tried optimistically.
    fn select_source(&self) -> Option<&MediaFile> {
        self.files.iter().find(|file| match file.mime_type() {
            Some(mime) => self.can_play_type(&mime) != CanPlayType::Empty,
            None => true,
        })
    }
}

impl MediaAdapter for HtmlMediaAdapter {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn load(&mut self) -> Result<(), MediaError> {
        if self.destroyed {
            return Err(MediaError::Destroyed);
        }
        self.error = None;
        self.ready_state = MediaReadyState::HaveNothing;

        if self.files.is_empty() {
            self.network_state = MediaNetworkState::NoSource;
            return Err(MediaError::NoSource);
        }

        let Some(file) = self.select_source() else {
            self.network_state = MediaNetworkState::NoSource;
            self.error = Some(MediaError::SrcNotSupported);
            return Err(MediaError::SrcNotSupported);
        };
        let url = file.url.clone();

        tracing::debug!("{} loading {}", self.kind, url);
        self.current_src = Some(url);
        self.network_state = MediaNetworkState::Loading;
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.destroyed {
            return Err(MediaError::Destroyed);
        }
        if self.ready_state == MediaReadyState::HaveNothing {
            if self.network_state != MediaNetworkState::Loading {
                return Err(MediaError::NotReady);
            }
            self.play_pending = true;
            return Ok(());
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        if self.destroyed {
            return Err(MediaError::Destroyed);
        }
        self.play_pending = false;
        self.paused = true;
        Ok(())
    }

    fn mark_ready(&mut self) {
        if self.destroyed || self.current_src.is_none() {
            return;
        }
        self.ready_state = MediaReadyState::HaveEnoughData;
        self.network_state = MediaNetworkState::Idle;
        if std::mem::take(&mut self.play_pending) {
            self.paused = false;
        }
    }

    fn fail(&mut self, error: MediaError) {
        if self.destroyed {
            return;
        }
        tracing::warn!("{} load failed: {}", self.kind, error);
        self.play_pending = false;
        self.paused = true;
        self.network_state = MediaNetworkState::Idle;
        self.error = Some(error);
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.paused = true;
        self.play_pending = false;
        self.current_src = None;
        self.network_state = MediaNetworkState::Empty;
        self.ready_state = MediaReadyState::HaveNothing;
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn clear_files(&mut self) {
        self.files.clear();
    }

    fn set_files(&mut self, files: Vec<MediaFile>) {
        self.files = files;
    }

    fn files(&self) -> &[MediaFile] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_selects_first_playable() {
        let mut media = HtmlMediaAdapter::video(vec![
            MediaFile::with_mime("clip.mkv", "video/x-matroska"),
            MediaFile::new("clip.webm"),
        ]);
        assert!(media.load().is_ok());
        assert_eq!(media.current_src(), Some("clip.webm"));
        assert_eq!(media.network_state(), MediaNetworkState::Loading);
    }

    #[test]
    fn test_load_without_files() {
        let mut media = HtmlMediaAdapter::audio(Vec::new());
        assert_eq!(media.load(), Err(MediaError::NoSource));
        assert_eq!(media.network_state(), MediaNetworkState::NoSource);
    }

    #[test]
    fn test_play_before_ready_is_queued() {
        let mut media = HtmlMediaAdapter::video(vec![MediaFile::new("a.mp4")]);
        assert_eq!(media.play(), Err(MediaError::NotReady));

        media.load().unwrap();
        assert!(media.play().is_ok());
        assert!(media.is_paused());
        assert!(media.play_pending());

        media.mark_ready();
        assert!(!media.is_paused());
        assert!(!media.play_pending());
    }

    #[test]
    fn test_pause_cancels_queued_play() {
        let mut media = HtmlMediaAdapter::video(vec![MediaFile::new("a.mp4")]);
        media.load().unwrap();
        media.play().unwrap();
        media.pause().unwrap();
        media.mark_ready();
        assert!(media.is_paused());
    }

    #[test]
    fn test_failure_drops_queued_play() {
        let mut media = HtmlMediaAdapter::video(vec![MediaFile::new("a.mp4")]);
        media.load().unwrap();
        media.play().unwrap();
        media.fail(MediaError::Network);
        assert!(!media.play_pending());
        assert!(media.is_paused());
        assert_eq!(media.error(), Some(&MediaError::Network));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut media = HtmlMediaAdapter::audio(vec![MediaFile::new("a.mp3")]);
        media.load().unwrap();
        media.destroy();
        media.destroy();
        assert!(media.is_destroyed());
        assert_eq!(media.play(), Err(MediaError::Destroyed));
        assert_eq!(media.load(), Err(MediaError::Destroyed));
    }

    #[test]
    fn test_can_play_type() {
        let media = HtmlMediaAdapter::video(Vec::new());
        assert_eq!(media.can_play_type("video/mp4; codecs=\"avc1\""), CanPlayType::Probably);
        assert_eq!(media.can_play_type("video/unknown"), CanPlayType::Empty);
        assert_eq!(CanPlayType::Maybe.as_str(), "maybe");
    }
}

//! Adapter over embedded `<iframe>` players.

use crate::adapter::{MediaAdapter, MediaError, MediaFile, MediaKind};

/// An embedded player. The embed loads itself, so the adapter only
/// tracks which URL is current and the requested transport state.
#[derive(Debug)]
pub struct IframeMediaAdapter {
    files: Vec<MediaFile>,
    embed_url: Option<String>,
    paused: bool,
    destroyed: bool,
}

impl IframeMediaAdapter {
    pub fn new(files: Vec<MediaFile>) -> Self {
        Self {
            files,
            embed_url: None,
            paused: true,
            destroyed: false,
        }
    }

    pub fn embed_url(&self) -> Option<&str> {
        self.embed_url.as_deref()
    }
}

impl MediaAdapter for IframeMediaAdapter {
    fn kind(&self) -> MediaKind {
        MediaKind::Iframe
    }

    fn load(&mut self) -> Result<(), MediaError> {
        if self.destroyed {
            return Err(MediaError::Destroyed);
        }
        let file = self.files.first().ok_or(MediaError::NoSource)?;
        self.embed_url = Some(file.url.clone());
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.destroyed {
            return Err(MediaError::Destroyed);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        if self.destroyed {
            return Err(MediaError::Destroyed);
        }
        self.paused = true;
        Ok(())
    }

    /// Embeds report readiness themselves.
    fn mark_ready(&mut self) {}

    fn fail(&mut self, error: MediaError) {
        tracing::warn!("embed failed: {}", error);
        self.paused = true;
    }

    fn destroy(&mut self) {
        self.paused = true;
        self.embed_url = None;
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
    fn test_iframe_adapter() {
        let url = "https://player.example/embed/1";
        let mut embed = IframeMediaAdapter::new(vec![MediaFile::new(url)]);
        embed.load().unwrap();
        assert_eq!(embed.embed_url(), Some("https://player.example/embed/1"));

        embed.play().unwrap();
        assert!(!embed.is_paused());
        embed.fail(MediaError::Network);
        assert!(embed.is_paused());
        embed.destroy();
        assert_eq!(embed.pause(), Err(MediaError::Destroyed));
    }

    #[test]
    fn test_iframe_without_source() {
        let mut embed = IframeMediaAdapter::new(Vec::new());
        assert_eq!(embed.load(), Err(MediaError::NoSource));
    }
}

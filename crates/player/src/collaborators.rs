//! Factory for the collaborators a player delegates to.

use crate::config::PlayerConfig;
use crate::controls::{ChromeControls, ControlsBuilder};
use crate::player::PlayerWeak;
use browser_media::{
    shared, AdBreak, AdsController, HtmlMediaAdapter, IframeMediaAdapter, MediaError, MediaFile,
    MediaKind, SharedMedia,
};
use dom::NodeId;

/// Builds media adapters, ads controllers and controls for new players.
pub trait Collaborators: Send + Sync {
    /// Build the adapter for an element of `kind` holding `files`.
    fn media(&self, kind: MediaKind, files: Vec<MediaFile>) -> Result<SharedMedia, MediaError>;

    /// Build an ads controller bound to `media`.
    fn ads(&self, media: SharedMedia, url: &str) -> Result<Box<dyn AdsController>, MediaError>;

    fn controls(
        &self,
        player: PlayerWeak,
        container: NodeId,
        config: &PlayerConfig,
    ) -> Box<dyn ControlsBuilder>;
}

/// The concrete collaborators from `browser_media` and [`ChromeControls`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCollaborators;

impl Collaborators for DefaultCollaborators {
    fn media(&self, kind: MediaKind, files: Vec<MediaFile>) -> Result<SharedMedia, MediaError> {
        Ok(match kind {
            MediaKind::Audio | MediaKind::Video => shared(HtmlMediaAdapter::new(kind, files)),
            MediaKind::Iframe => shared(IframeMediaAdapter::new(files)),
        })
    }

    fn ads(&self, media: SharedMedia, url: &str) -> Result<Box<dyn AdsController>, MediaError> {
        Ok(Box::new(AdBreak::new(media, url)?))
    }

    fn controls(
        &self,
        player: PlayerWeak,
        container: NodeId,
        config: &PlayerConfig,
    ) -> Box<dyn ControlsBuilder> {
        Box::new(ChromeControls::new(player, container, &config.controls_class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_media_kinds() {
        let factory = DefaultCollaborators;
        for kind in [MediaKind::Audio, MediaKind::Video, MediaKind::Iframe] {
            let media = factory.media(kind, vec![MediaFile::new("a.mp4")]).unwrap();
            assert_eq!(media.read().kind(), kind);
            assert_eq!(media.read().files().len(), 1);
        }
    }

    #[test]
    fn test_default_ads_rejects_bad_url() {
        let factory = DefaultCollaborators;
        let media = factory.media(MediaKind::Video, Vec::new()).unwrap();
        assert!(matches!(
            factory.ads(media.clone(), "not a url"),
            Err(MediaError::InvalidAdUrl(_))
        ));
        let ads = factory.ads(media, "http://x/ad.xml").unwrap();
        assert!(!ads.started());
        assert_eq!(ads.url(), "http://x/ad.xml");
    }
}

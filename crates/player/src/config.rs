//! Player configuration.

use browser_media::MediaKind;
use common::{PlayerError, PlayerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Class names, attribute names and identity settings used when upgrading
/// elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Marker class identifying upgradeable elements.
    pub marker_class: String,
    /// Container class for audio players.
    pub audio_class: String,
    /// Container class for video and iframe players.
    pub video_class: String,
    /// Container class while keyboard interaction is active.
    pub keyboard_class: String,
    /// Class of the controls bar built by the default chrome.
    pub controls_class: String,
    /// Attribute naming the ad source URL.
    pub ads_attribute: String,
    /// Attribute recording the element's original `src`.
    pub file_attribute: String,
    /// Attribute caching an iframe's aspect ratio.
    pub ratio_attribute: String,
    /// Prefix of generated uids.
    pub uid_prefix: String,
    /// Length of the random base-36 part of generated uids.
    pub uid_length: usize,
    /// Whether `destroy()` removes the player from its registry.
    pub remove_on_destroy: bool,
}

impl PlayerConfig {
    /// Shortest random part a generated uid may have.
    pub const MIN_UID_LENGTH: usize = 4;

    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> PlayerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> PlayerResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> PlayerResult<()> {
        if self.marker_class.trim().is_empty() || self.marker_class.contains(char::is_whitespace) {
            return Err(PlayerError::config("marker_class must be a single class name"));
        }
        if self.uid_length < Self::MIN_UID_LENGTH {
            return Err(PlayerError::config(format!(
                "uid_length must be at least {}",
                Self::MIN_UID_LENGTH
            )));
        }
        for (name, value) in [
            ("ads_attribute", &self.ads_attribute),
            ("file_attribute", &self.file_attribute),
            ("ratio_attribute", &self.ratio_attribute),
        ] {
            if value.is_empty() {
                return Err(PlayerError::config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn with_marker_class(mut self, class: &str) -> Self {
        self.marker_class = class.to_string();
        self
    }

    pub fn with_uid_prefix(mut self, prefix: &str) -> Self {
        self.uid_prefix = prefix.to_string();
        self
    }

    pub fn with_uid_length(mut self, length: usize) -> Self {
        self.uid_length = length;
        self
    }

    pub fn with_remove_on_destroy(mut self, remove: bool) -> Self {
        self.remove_on_destroy = remove;
        self
    }

    /// Random part length used for generated uids. Configs built in code
    /// skip `validate()`, so a too-short length is raised to the minimum.
    pub fn token_length(&self) -> usize {
        self.uid_length.max(Self::MIN_UID_LENGTH)
    }

    /// Selector the bulk entry point scans with.
    pub fn upgrade_selector(&self) -> String {
        format!("audio.{0}, video.{0}", self.marker_class)
    }

    /// Type-specific class for a player container.
    pub fn container_class(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Audio => &self.audio_class,
            MediaKind::Video | MediaKind::Iframe => &self.video_class,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            marker_class: "om-player".to_string(),
            audio_class: "om-audio".to_string(),
            video_class: "om-video".to_string(),
            keyboard_class: "om-keyboard-active".to_string(),
            controls_class: "om-controls".to_string(),
            ads_attribute: "data-om-ads".to_string(),
            file_attribute: "data-om-file".to_string(),
            ratio_attribute: "data-ratio".to_string(),
            uid_prefix: "om-".to_string(),
            uid_length: 8,
            remove_on_destroy: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.upgrade_selector(), "audio.om-player, video.om-player");
        assert_eq!(config.container_class(MediaKind::Audio), "om-audio");
        assert_eq!(config.container_class(MediaKind::Iframe), "om-video");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "uid_prefix": "vid-", "remove_on_destroy": false }"#;
        let config = PlayerConfig::from_json_str(json).unwrap();
        assert_eq!(config.uid_prefix, "vid-");
        assert!(!config.remove_on_destroy);
        assert_eq!(config.marker_class, "om-player");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            PlayerConfig::from_json_str(r#"{ "uid_length": 2 }"#),
            Err(PlayerError::Config(_))
        ));
        assert!(matches!(
            PlayerConfig::from_json_str(r#"{ "marker_class": "a b" }"#),
            Err(PlayerError::Config(_))
        ));
        assert!(matches!(
            PlayerConfig::from_json_str("{"),
            Err(PlayerError::Json(_))
        ));
    }

    #[test]
    fn test_builders() {
        let config = PlayerConfig::new()
            .with_marker_class("media-upgrade")
            .with_uid_prefix("clip-")
            .with_uid_length(0);
        assert_eq!(config.upgrade_selector(), "audio.media-upgrade, video.media-upgrade");
        assert_eq!(config.uid_prefix, "clip-");
        assert!(config.validate().is_err());
        assert_eq!(config.token_length(), PlayerConfig::MIN_UID_LENGTH);
        assert_eq!(config.with_uid_length(12).token_length(), 12);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            PlayerConfig::from_path("/nonexistent/om-player.json"),
            Err(PlayerError::Io(_))
        ));
    }
}

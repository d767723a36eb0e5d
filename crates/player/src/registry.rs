//! Registry of live players and page-level bulk initialization.

use crate::collaborators::Collaborators;
use crate::config::PlayerConfig;
use crate::player::{InitOutcome, Player, PlayerRef};
use dom::Document;
use indexmap::IndexMap;
use std::sync::Arc;

/// Players keyed by uid, in registration order.
#[derive(Default)]
pub struct PlayerRegistry {
    players: IndexMap<String, PlayerRef>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upgrade every marked audio and video element in `doc` and return a
    /// fresh registry of the results.
    ///
    /// Candidates are independent: a rejected or degraded one does not
    /// stop the others.
    pub fn bulk_init(
        doc: &mut Document,
        config: Arc<PlayerConfig>,
        collaborators: Arc<dyn Collaborators>,
    ) -> Self {
        let mut registry = Self::new();
        let candidates = doc.query_selector_all(&config.upgrade_selector());

        let (mut ready, mut degraded, mut rejected) = (0usize, 0usize, 0usize);
        for element in candidates {
            let ads_url = doc
                .tree
                .get_element(element)
                .and_then(|e| e.get_attribute(&config.ads_attribute))
                .filter(|url| !url.is_empty())
                .map(str::to_string);

            let player = Player::with_options(
                element,
                ads_url.as_deref(),
                config.clone(),
                collaborators.clone(),
            );
            let outcome = player.write().init(doc, &mut registry);
            match outcome {
                InitOutcome::Ready => ready += 1,
                InitOutcome::MediaPrepFailed(_) => degraded += 1,
                InitOutcome::ValidationFailed(_) => rejected += 1,
            }
        }

        tracing::info!(
            "bulk init: {} ready, {} degraded, {} rejected",
            ready,
            degraded,
            rejected
        );
        registry
    }

    pub fn get(&self, uid: &str) -> Option<&PlayerRef> {
        self.players.get(uid)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.players.contains_key(uid)
    }

    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.players.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Remove a player, keeping the order of the rest.
    pub fn remove(&mut self, uid: &str) -> Option<PlayerRef> {
        self.players.shift_remove(uid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlayerRef)> {
        self.players.iter().map(|(uid, player)| (uid.as_str(), player))
    }

    pub(crate) fn insert(&mut self, uid: String, player: PlayerRef) {
        if self.players.insert(uid.clone(), player).is_some() {
            tracing::warn!("replaced registry entry {}", uid);
        }
    }
}

impl std::fmt::Debug for PlayerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerRegistry")
            .field("uids", &self.players.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::DefaultCollaborators;
    use crate::player::PlayerState;
    use browser_media::MediaError;

    fn page() -> Document {
        let mut doc = Document::blank();
        for (tag, attrs) in [
            ("video", r#"id="intro" class="om-player" src="intro.mp4""#),
            (
                "audio",
                r#"class="om-player" src="song.mp3" data-om-ads="http://ads.example/vast.xml""#,
            ),
            ("video", r#"class="om-player""#),
            ("video", r#"class="other" src="plain.mp4""#),
            ("iframe", r#"class="om-player" src="https://embed/1" width="16" height="9""#),
            ("div", r#"class="om-player""#),
        ] {
            let node = doc.create_element_with(tag, attrs);
            doc.append_to_body(node);
        }
        doc
    }

    fn bulk(doc: &mut Document) -> PlayerRegistry {
        PlayerRegistry::bulk_init(
            doc,
            Arc::new(PlayerConfig::default()),
            Arc::new(DefaultCollaborators),
        )
    }

    #[test]
    fn test_bulk_init_upgrades_marked_audio_and_video() {
        let mut doc = page();
        let registry = bulk(&mut doc);

        // Iframes and divs are not scanned; the sourceless video degrades
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.uids().next(), Some("intro"));

        let kinds: Vec<_> = registry
            .iter()
            .map(|(_, p)| p.read().kind().map(|k| k.as_str()))
            .collect();
        assert_eq!(kinds, vec![Some("video"), Some("audio"), Some("video")]);

        let states: Vec<PlayerState> =
            registry.iter().map(|(_, p)| p.read().state().clone()).collect();
        assert_eq!(
            states,
            vec![
                PlayerState::Ready,
                PlayerState::Ready,
                PlayerState::Degraded(MediaError::NoSource),
            ]
        );
    }

    #[test]
    fn test_bulk_init_reads_ads_attribute() {
        let mut doc = page();
        let registry = bulk(&mut doc);

        let with_ads: Vec<Option<String>> = registry
            .iter()
            .map(|(_, p)| p.read().ads().map(|a| a.url().to_string()))
            .collect();
        assert_eq!(
            with_ads,
            vec![None, Some("http://ads.example/vast.xml".to_string()), None]
        );
    }

    #[test]
    fn test_bulk_init_bad_ads_url_keeps_media_playable() {
        let mut doc = Document::blank();
        let video = doc.create_element_with(
            "video",
            r#"class="om-player" src="intro.mp4" data-om-ads="not a url""#,
        );
        doc.append_to_body(video);
        let registry = bulk(&mut doc);

        let (_, player) = registry.iter().next().unwrap();
        assert!(matches!(
            player.read().state(),
            PlayerState::Degraded(MediaError::InvalidAdUrl(_))
        ));
        assert!(player.read().ads().is_none());

        player.write().play().unwrap();
        let media = player.read().media().cloned().unwrap();
        assert!(!media.read().is_destroyed());
        assert!(media.read().files().iter().any(|f| f.url == "intro.mp4"));
    }

    #[test]
    fn test_bulk_init_returns_a_fresh_registry() {
        let mut doc = page();
        let first = bulk(&mut doc);
        assert_eq!(first.len(), 3);

        // Upgraded elements lost their marker, so a rerun finds nothing
        let second = bulk(&mut doc);
        assert!(second.is_empty());
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut doc = page();
        let mut registry = bulk(&mut doc);
        let uids: Vec<String> = registry.uids().map(str::to_string).collect();

        assert!(registry.remove(&uids[1]).is_some());
        assert!(registry.remove(&uids[1]).is_none());
        let rest: Vec<&str> = registry.uids().collect();
        assert_eq!(rest, vec![uids[0].as_str(), uids[2].as_str()]);
        assert!(!registry.contains(&uids[1]));
        assert!(registry.get(&uids[0]).is_some());
    }
}

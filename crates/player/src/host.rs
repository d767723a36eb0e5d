//! Page-level entry point.

use crate::collaborators::{Collaborators, DefaultCollaborators};
use crate::config::PlayerConfig;
use crate::player::{InitOutcome, Player, PlayerRef, PlayerTarget};
use crate::registry::PlayerRegistry;
use common::{PlayerError, PlayerResult};
use dom::Document;
use std::sync::Arc;

/// Owns a document and the players upgraded in it.
///
/// `document_loaded()` runs bulk initialization the way a page does at
/// load; `create_player()` is the programmatic constructor.
pub struct PlayerHost {
    document: Document,
    config: Arc<PlayerConfig>,
    collaborators: Arc<dyn Collaborators>,
    registry: PlayerRegistry,
}

impl PlayerHost {
    /// Create a host. Fails if `config` does not validate.
    pub fn new(
        document: Document,
        config: PlayerConfig,
        collaborators: Arc<dyn Collaborators>,
    ) -> PlayerResult<Self> {
        config.validate()?;
        Ok(Self {
            document,
            config: Arc::new(config),
            collaborators,
            registry: PlayerRegistry::new(),
        })
    }

    pub fn with_defaults(document: Document) -> Self {
        Self {
            document,
            config: Arc::new(PlayerConfig::default()),
            collaborators: Arc::new(DefaultCollaborators),
            registry: PlayerRegistry::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Mark the document loaded and upgrade every marked element. The
    /// registry is replaced by the result.
    pub fn document_loaded(&mut self) -> &PlayerRegistry {
        self.document.finish_loading();
        self.registry = PlayerRegistry::bulk_init(
            &mut self.document,
            self.config.clone(),
            self.collaborators.clone(),
        );
        &self.registry
    }

    /// Construct and initialize one player.
    pub fn create_player(
        &mut self,
        target: impl Into<PlayerTarget>,
        ads_url: Option<&str>,
    ) -> (PlayerRef, InitOutcome) {
        let player = Player::with_options(
            target,
            ads_url,
            self.config.clone(),
            self.collaborators.clone(),
        );
        let outcome = player.write().init(&mut self.document, &mut self.registry);
        (player, outcome)
    }

    pub fn player(&self, uid: &str) -> Option<PlayerRef> {
        self.registry.get(uid).cloned()
    }

    pub fn destroy_player(&mut self, uid: &str) -> PlayerResult<()> {
        let player = self
            .player(uid)
            .ok_or_else(|| PlayerError::not_found(format!("player {uid}")))?;
        player.write().destroy(&mut self.document, &mut self.registry);
        Ok(())
    }
}

//! The player orchestrator.
//!
//! A [`Player`] upgrades one audio, video or iframe element: it validates
//! the candidate, wraps it in a container, prepares the media adapter and
//! the optional ad break, renders controls, and registers itself under a
//! unique id. Playback commands are routed to the ad break whenever one
//! exists, and to the media otherwise.

use crate::collaborators::{Collaborators, DefaultCollaborators};
use crate::config::PlayerConfig;
use crate::controls::ControlsBuilder;
use crate::registry::PlayerRegistry;
use crate::responsive;
use crate::uid::generate_uid;
use crate::validate::{validate, ValidationError};
use browser_media::{AdsController, MediaError, MediaFile, MediaKind, SharedMedia};
use dom::{Document, DomTree, Event, EventTargetRef, ListenerId, NodeId};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Shared handle to a player. Registries and UI callbacks hold these.
pub type PlayerRef = Arc<RwLock<Player>>;

/// Non-owning handle, given to controls builders.
pub type PlayerWeak = Weak<RwLock<Player>>;

/// The element a player upgrades.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerTarget {
    Element(NodeId),
    /// Resolved against the document at `init()`.
    Id(String),
}

impl From<NodeId> for PlayerTarget {
    fn from(node: NodeId) -> Self {
        PlayerTarget::Element(node)
    }
}

impl From<&str> for PlayerTarget {
    fn from(id: &str) -> Self {
        PlayerTarget::Id(id.to_string())
    }
}

impl From<String> for PlayerTarget {
    fn from(id: String) -> Self {
        PlayerTarget::Id(id)
    }
}

/// Result of [`Player::init`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// Upgraded and registered.
    Ready,
    /// The candidate was rejected. Nothing was mutated or registered.
    ValidationFailed(ValidationError),
    /// Upgraded and registered, but media preparation failed.
    MediaPrepFailed(MediaError),
}

impl InitOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, InitOutcome::Ready)
    }

    /// Whether the player ended up in the registry.
    pub fn is_registered(&self) -> bool {
        !matches!(self, InitOutcome::ValidationFailed(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// Constructed, `init()` not yet run.
    Created,
    /// Validation failed. `init()` may be retried.
    Inert,
    Ready,
    Degraded(MediaError),
    Destroyed,
}

/// Which source owns the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSource {
    Ads,
    Media,
}

/// The collaborator returned by [`Player::active_element`].
pub enum ActiveElement<'a> {
    Ads(&'a dyn AdsController),
    Media(&'a SharedMedia),
}

impl ActiveElement<'_> {
    pub fn source(&self) -> ActiveSource {
        match self {
            ActiveElement::Ads(_) => ActiveSource::Ads,
            ActiveElement::Media(_) => ActiveSource::Media,
        }
    }
}

pub struct Player {
    this: PlayerWeak,
    target: PlayerTarget,
    ads_url: Option<String>,
    config: Arc<PlayerConfig>,
    collaborators: Arc<dyn Collaborators>,

    uid: Option<String>,
    element: Option<NodeId>,
    container: Option<NodeId>,
    kind: Option<MediaKind>,
    media: Option<SharedMedia>,
    ads: Option<Box<dyn AdsController>>,
    controls: Option<Box<dyn ControlsBuilder>>,
    /// Listeners installed by this player, removed on destroy.
    listeners: Vec<ListenerId>,
    state: PlayerState,
}

impl Player {
    /// Create a player with the default configuration and collaborators.
    pub fn new(target: impl Into<PlayerTarget>, ads_url: Option<&str>) -> PlayerRef {
        Self::with_options(
            target,
            ads_url,
            Arc::new(PlayerConfig::default()),
            Arc::new(DefaultCollaborators),
        )
    }

    /// Create a player. Never fails; an unresolvable target is reported
    /// by `init()`.
    pub fn with_options(
        target: impl Into<PlayerTarget>,
        ads_url: Option<&str>,
        config: Arc<PlayerConfig>,
        collaborators: Arc<dyn Collaborators>,
    ) -> PlayerRef {
        let target = target.into();
        let ads_url = ads_url.map(str::to_string);
        Arc::new_cyclic(|this| {
            RwLock::new(Player {
                this: this.clone(),
                target,
                ads_url,
                config,
                collaborators,
                uid: None,
                element: None,
                container: None,
                kind: None,
                media: None,
                ads: None,
                controls: None,
                listeners: Vec::new(),
                state: PlayerState::Created,
            })
        })
    }

    /// Upgrade the target element and register the player.
    ///
    /// Runs once; later calls return the outcome of the first successful
    /// run. A rejected candidate leaves the document untouched and may be
    /// retried.
    pub fn init(&mut self, doc: &mut Document, registry: &mut PlayerRegistry) -> InitOutcome {
        match &self.state {
            PlayerState::Ready => return InitOutcome::Ready,
            PlayerState::Degraded(e) => return InitOutcome::MediaPrepFailed(e.clone()),
            PlayerState::Destroyed => {
                return InitOutcome::ValidationFailed(ValidationError::Destroyed)
            }
            PlayerState::Created | PlayerState::Inert => {}
        }

        let (element, kind) = match self.resolve(doc) {
            Ok(found) => found,
            Err(e) => {
                debug!("not upgrading {:?}: {}", self.target, e);
                self.state = PlayerState::Inert;
                return InitOutcome::ValidationFailed(e);
            }
        };
        self.element = Some(element);
        self.kind = Some(kind);

        let container = self.wrap(doc, element, kind);

        let prepared = self.prepare_media(doc, element, kind);
        if let Err(e) = &prepared {
            warn!("media preparation failed for {} player: {}", kind, e);
        }

        self.build_controls(doc, container);
        let uid = self.assign_identity(doc, registry, element, container);

        match prepared {
            Ok(()) => {
                info!("upgraded {} player {}", kind, uid);
                self.state = PlayerState::Ready;
                InitOutcome::Ready
            }
            Err(e) => {
                self.state = PlayerState::Degraded(e.clone());
                InitOutcome::MediaPrepFailed(e)
            }
        }
    }

    fn resolve(&self, doc: &Document) -> Result<(NodeId, MediaKind), ValidationError> {
        let element = match &self.target {
            PlayerTarget::Element(node) => *node,
            PlayerTarget::Id(id) => doc
                .get_element_by_id(id)
                .ok_or_else(|| ValidationError::Unresolved(id.clone()))?,
        };
        let kind = validate(&doc.tree, element, &self.config.marker_class)?;
        Ok((element, kind))
    }

    /// Move the element into a new container that takes over its marker
    /// class and position.
    fn wrap(&mut self, doc: &mut Document, element: NodeId, kind: MediaKind) -> NodeId {
        let container = doc.create_element("div");
        let marker = &self.config.marker_class;
        doc.tree.remove_class(element, marker);
        doc.tree.add_class(container, marker);
        doc.tree.add_class(container, self.config.container_class(kind));

        if let Some(parent) = doc.tree.parent(element) {
            doc.tree.insert_before(parent, container, Some(element));
        }
        doc.tree.append_child(container, element);
        self.container = Some(container);

        let class = self.config.keyboard_class.clone();
        self.listeners.push(doc.add_event_listener(
            EventTargetRef::Node(container),
            "keydown",
            Arc::new(move |_: &mut Event, tree: &mut DomTree| tree.add_class(container, &class)),
        ));
        let class = self.config.keyboard_class.clone();
        self.listeners.push(doc.add_event_listener(
            EventTargetRef::Node(container),
            "click",
            Arc::new(move |_: &mut Event, tree: &mut DomTree| tree.remove_class(container, &class)),
        ));

        container
    }

    /// Build and load the media, then bind the ad break. An ad break that
    /// cannot be built leaves the loaded media in charge. Iframes are made
    /// responsive whenever their adapter exists.
    fn prepare_media(
        &mut self,
        doc: &mut Document,
        element: NodeId,
        kind: MediaKind,
    ) -> Result<(), MediaError> {
        let files = source_files(&doc.tree, element, kind);
        let media = self.collaborators.media(kind, files)?;
        self.media = Some(media.clone());

        // The adapter owns the source list from here on
        if kind != MediaKind::Iframe {
            if let Some(src) = doc.tree.remove_attribute(element, "src") {
                doc.tree.set_attribute(element, &self.config.file_attribute, &src);
            }
        }

        let prepared = self.start_transport(doc, element, kind, &media);

        if kind == MediaKind::Iframe {
            if let Some(listener) = responsive::enable(doc, element, &self.config) {
                self.listeners.push(listener);
            }
        }
        prepared
    }

    fn start_transport(
        &mut self,
        doc: &mut Document,
        element: NodeId,
        kind: MediaKind,
        media: &SharedMedia,
    ) -> Result<(), MediaError> {
        media.write().load()?;
        if kind != MediaKind::Iframe {
            self.watch_readiness(doc, element, media);
        }

        if let Some(url) = &self.ads_url {
            self.ads = Some(self.collaborators.ads(media.clone(), url)?);
        }
        Ok(())
    }

    /// Forward the element's `canplay` and `error` events to the adapter.
    fn watch_readiness(&mut self, doc: &mut Document, element: NodeId, media: &SharedMedia) {
        let ready = media.clone();
        self.listeners.push(doc.add_event_listener(
            EventTargetRef::Node(element),
            "canplay",
            Arc::new(move |_: &mut Event, _: &mut DomTree| ready.write().mark_ready()),
        ));
        let failed = media.clone();
        self.listeners.push(doc.add_event_listener(
            EventTargetRef::Node(element),
            "error",
            Arc::new(move |_: &mut Event, _: &mut DomTree| {
                failed.write().fail(MediaError::Network)
            }),
        ));
    }

    fn build_controls(&mut self, doc: &mut Document, container: NodeId) {
        let mut controls = self
            .collaborators
            .controls(self.this.clone(), container, &self.config);
        controls.prepare(doc);
        controls.render(doc);
        self.controls = Some(controls);
    }

    /// Adopt the element's id, or generate one, and move it onto the
    /// container.
    fn assign_identity(
        &mut self,
        doc: &mut Document,
        registry: &mut PlayerRegistry,
        element: NodeId,
        container: NodeId,
    ) -> String {
        let explicit = doc.tree.remove_attribute(element, "id");

        let uid = match explicit {
            Some(id) if !id.is_empty() && !registry.contains(&id) => id,
            explicit => {
                if let Some(id) = explicit.filter(|id| !id.is_empty()) {
                    warn!("id {:?} is already registered, generating a uid", id);
                }
                let config = &self.config;
                generate_uid(
                    &mut rand::thread_rng(),
                    &config.uid_prefix,
                    config.token_length(),
                    |candidate| {
                        registry.contains(candidate) || doc.get_element_by_id(candidate).is_some()
                    },
                )
            }
        };

        doc.tree.set_attribute(container, "id", &uid);
        match self.this.upgrade() {
            Some(this) => registry.insert(uid.clone(), this),
            None => warn!("player {} dropped during init, not registered", uid),
        }
        self.uid = Some(uid.clone());
        uid
    }

    pub fn play(&mut self) -> Result<(), MediaError> {
        if self.state == PlayerState::Destroyed {
            return Err(MediaError::Destroyed);
        }
        if let Some(ads) = self.ads.as_mut() {
            return ads.play();
        }
        match &self.media {
            Some(media) => media.write().play(),
            None => Err(MediaError::NotReady),
        }
    }

    pub fn pause(&mut self) -> Result<(), MediaError> {
        if self.state == PlayerState::Destroyed {
            return Err(MediaError::Destroyed);
        }
        if let Some(ads) = self.ads.as_mut() {
            return ads.pause();
        }
        match &self.media {
            Some(media) => media.write().pause(),
            None => Err(MediaError::NotReady),
        }
    }

    /// Reload the media. A no-op before the media exists.
    pub fn load(&mut self) -> Result<(), MediaError> {
        match &self.media {
            Some(media) => media.write().load(),
            None => Ok(()),
        }
    }

    /// Whoever owns the transport right now: the ad break once it has
    /// started, the media otherwise. `None` until media exists.
    pub fn active_element(&self) -> Option<ActiveElement<'_>> {
        if let Some(ads) = &self.ads {
            if ads.started() {
                return Some(ActiveElement::Ads(ads.as_ref()));
            }
        }
        self.media.as_ref().map(ActiveElement::Media)
    }

    pub fn active_source(&self) -> Option<ActiveSource> {
        self.active_element().map(|active| active.source())
    }

    /// Tear the player down and release every listener it installed.
    /// Safe to call more than once.
    pub fn destroy(&mut self, doc: &mut Document, registry: &mut PlayerRegistry) {
        if self.state == PlayerState::Destroyed {
            return;
        }

        for id in self.listeners.drain(..) {
            doc.remove_event_listener(id);
        }
        if let Some(mut controls) = self.controls.take() {
            controls.teardown(doc);
        }

        if let Some(ads) = self.ads.as_mut() {
            ads.destroy();
        } else {
            if let Some(element) = self.element {
                if let Some(src) = doc.tree.remove_attribute(element, &self.config.file_attribute) {
                    doc.tree.set_attribute(element, "src", &src);
                }
            }
            if let Some(media) = &self.media {
                media.write().destroy();
            }
        }

        if self.config.remove_on_destroy {
            if let Some(uid) = &self.uid {
                let registered_here = registry
                    .get(uid)
                    .is_some_and(|entry| Arc::as_ptr(entry) == self.this.as_ptr());
                if registered_here {
                    registry.remove(uid);
                }
            }
        }

        debug!("destroyed player {:?}", self.uid);
        self.state = PlayerState::Destroyed;
    }

    /// Replace the media's file list. A no-op before the media exists.
    pub fn set_src(&mut self, files: Vec<MediaFile>) {
        if let Some(media) = &self.media {
            let mut media = media.write();
            media.clear_files();
            media.set_files(files);
        }
    }

    pub fn src(&self) -> Vec<MediaFile> {
        self.media
            .as_ref()
            .map(|media| media.read().files().to_vec())
            .unwrap_or_default()
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn target(&self) -> &PlayerTarget {
        &self.target
    }

    pub fn ads_url(&self) -> Option<&str> {
        self.ads_url.as_deref()
    }

    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn kind(&self) -> Option<MediaKind> {
        self.kind
    }

    pub fn media(&self) -> Option<&SharedMedia> {
        self.media.as_ref()
    }

    pub fn ads(&self) -> Option<&dyn AdsController> {
        self.ads.as_deref()
    }

    pub fn ads_mut(&mut self) -> Option<&mut (dyn AdsController + 'static)> {
        self.ads.as_deref_mut()
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Listeners this player still holds, not counting its controls.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Files named by the element: its `src`, then any `<source>` children.
/// Iframes only have `src`.
fn source_files(tree: &DomTree, element: NodeId, kind: MediaKind) -> Vec<MediaFile> {
    let Some(elem) = tree.get_element(element) else {
        return Vec::new();
    };
    let mut files: Vec<MediaFile> = elem
        .get_attribute("src")
        .filter(|src| !src.is_empty())
        .map(MediaFile::new)
        .into_iter()
        .collect();

    if kind != MediaKind::Iframe {
        for child in tree.children(element) {
            let Some(source) = tree.get_element(child).filter(|e| e.tag_name == "source") else {
                continue;
            };
            let Some(src) = source.get_attribute("src").filter(|src| !src.is_empty()) else {
                continue;
            };
            files.push(match source.get_attribute("type") {
                Some(mime) => MediaFile::with_mime(src, mime),
                None => MediaFile::new(src),
            });
        }
    }
    files
}

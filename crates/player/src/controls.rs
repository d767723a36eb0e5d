//! Player chrome.

use crate::player::PlayerWeak;
use dom::{Document, DomTree, ElementData, Event, EventTargetRef, ListenerId, NodeId};
use std::sync::Arc;

/// Builds and renders the UI chrome of one player.
///
/// Builders are created with a weak handle to the player, which they use
/// as the target of UI-issued commands.
pub trait ControlsBuilder: Send + Sync {
    /// Create the chrome nodes. Nothing is attached yet.
    fn prepare(&mut self, doc: &mut Document);

    /// Attach the chrome and wire its listeners.
    fn render(&mut self, doc: &mut Document);

    /// Remove everything `prepare` and `render` created.
    fn teardown(&mut self, doc: &mut Document);
}

/// Default chrome: a bar with a play and a pause button, appended to the
/// player container.
pub struct ChromeControls {
    player: PlayerWeak,
    container: NodeId,
    class: String,
    bar: Option<NodeId>,
    play_button: Option<NodeId>,
    pause_button: Option<NodeId>,
    listeners: Vec<ListenerId>,
}

impl ChromeControls {
    pub fn new(player: PlayerWeak, container: NodeId, class: &str) -> Self {
        Self {
            player,
            container,
            class: class.to_string(),
            bar: None,
            play_button: None,
            pause_button: None,
            listeners: Vec::new(),
        }
    }

    pub fn bar(&self) -> Option<NodeId> {
        self.bar
    }

    pub fn play_button(&self) -> Option<NodeId> {
        self.play_button
    }

    pub fn pause_button(&self) -> Option<NodeId> {
        self.pause_button
    }

    fn button(doc: &mut Document, class: &str, label: &str) -> NodeId {
        let attrs = format!(r#"type="button" class="{class}""#);
        let button = doc.tree.create_element(ElementData::parse("button", &attrs));
        let text = doc.tree.create_text(label.to_string());
        doc.tree.append_child(button, text);
        button
    }
}

impl ControlsBuilder for ChromeControls {
    fn prepare(&mut self, doc: &mut Document) {
        if self.bar.is_some() {
            return;
        }
        let bar = doc
            .tree
            .create_element(ElementData::parse("div", &format!(r#"class="{}""#, self.class)));
        let play = Self::button(doc, "om-play", "Play");
        let pause = Self::button(doc, "om-pause", "Pause");
        doc.tree.append_child(bar, play);
        doc.tree.append_child(bar, pause);

        self.bar = Some(bar);
        self.play_button = Some(play);
        self.pause_button = Some(pause);
    }

    fn render(&mut self, doc: &mut Document) {
        let (Some(bar), Some(play), Some(pause)) = (self.bar, self.play_button, self.pause_button)
        else {
            tracing::warn!("controls rendered before prepare");
            return;
        };
        if !self.listeners.is_empty() {
            return;
        }
        doc.tree.append_child(self.container, bar);

        let player = self.player.clone();
        self.listeners.push(doc.add_event_listener(
            EventTargetRef::Node(play),
            "click",
            Arc::new(move |_: &mut Event, _: &mut DomTree| {
                if let Some(player) = player.upgrade() {
                    if let Err(e) = player.write().play() {
                        tracing::debug!("play from controls: {}", e);
                    }
                }
            }),
        ));

        let player = self.player.clone();
        self.listeners.push(doc.add_event_listener(
            EventTargetRef::Node(pause),
            "click",
            Arc::new(move |_: &mut Event, _: &mut DomTree| {
                if let Some(player) = player.upgrade() {
                    if let Err(e) = player.write().pause() {
                        tracing::debug!("pause from controls: {}", e);
                    }
                }
            }),
        ));
    }

    fn teardown(&mut self, doc: &mut Document) {
        for id in self.listeners.drain(..) {
            doc.remove_event_listener(id);
        }
        if let Some(bar) = self.bar.take() {
            doc.tree.remove(bar);
        }
        self.play_button = None;
        self.pause_button = None;
    }
}

//! DOM Document implementation.

use crate::element::{ElementData, TagName};
use crate::events::{Event, EventCallback, EventManager, EventTargetRef, EventType, ListenerId};
use crate::node::NodeId;
use crate::tree::DomTree;
use crate::window::Window;
use url::Url;

/// Document ready state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadyState::Loading => "loading",
            ReadyState::Interactive => "interactive",
            ReadyState::Complete => "complete",
        }
    }
}

/// DOM Document: tree, window, and the listeners attached to either.
pub struct Document {
    /// The DOM tree.
    pub tree: DomTree,
    /// The window hosting this document.
    pub window: Window,
    /// Listeners for nodes and the window.
    pub events: EventManager,
    /// Document URL.
    pub url: Url,
    pub ready_state: ReadyState,
    /// Document element (<html>).
    pub document_element: NodeId,
    pub head: NodeId,
    pub body: NodeId,
}

impl Document {
    /// Create a document with an empty `<html><head></head><body></body></html>` skeleton.
    pub fn new(url: Url) -> Self {
        Self::with_window(url, Window::new())
    }

    pub fn with_window(url: Url, window: Window) -> Self {
        let mut tree = DomTree::new();
        let root = tree.root();
        let document_element = tree.create_element(ElementData::new(TagName::html()));
        let head = tree.create_element(ElementData::new(TagName::head()));
        let body = tree.create_element(ElementData::new(TagName::body()));
        tree.append_child(root, document_element);
        tree.append_child(document_element, head);
        tree.append_child(document_element, body);
        tree.set_rendered_size(root, window.viewport());

        Self {
            tree,
            window,
            events: EventManager::new(),
            url,
            ready_state: ReadyState::Loading,
            document_element,
            head,
            body,
        }
    }

    /// Create a blank document.
    pub fn blank() -> Self {
        Self::new(Url::parse("about:blank").expect("about:blank is a valid URL"))
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.tree.create_element(ElementData::new(TagName::new(tag_name)))
    }

    /// Create a detached element from a tag and an attribute string.
    pub fn create_element_with(&mut self, tag_name: &str, attrs: &str) -> NodeId {
        self.tree.create_element(ElementData::parse(tag_name, attrs))
    }

    /// Append child to body.
    pub fn append_to_body(&mut self, node: NodeId) {
        self.tree.append_child(self.body, node);
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find_element_by_id(id)
    }

    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.tree.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.tree.query_selector_all(selector)
    }

    pub fn add_event_listener(
        &mut self,
        target: EventTargetRef,
        event_type: &str,
        callback: EventCallback,
    ) -> ListenerId {
        self.events.add_listener(target, event_type, callback)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    /// Dispatch an event. Returns false if the default was prevented.
    pub fn dispatch_event(&mut self, target: EventTargetRef, event: &mut Event) -> bool {
        self.events.dispatch(&mut self.tree, target, event)
    }

    /// Resize the viewport and fire `resize` on the window.
    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        self.window.resize_to(width, height);
        let root = self.tree.root();
        self.tree.set_rendered_size(root, self.window.viewport());

        let mut event = Event::new(EventType::Resize);
        self.dispatch_event(EventTargetRef::Window, &mut event);
    }

    /// Mark document as completely loaded and fire `load` on the window.
    pub fn finish_loading(&mut self) {
        self.ready_state = ReadyState::Complete;
        let mut event = Event::new(EventType::Load);
        self.dispatch_event(EventTargetRef::Window, &mut event);
    }
}

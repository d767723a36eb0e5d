//! DOM Events implementation.

use crate::node::NodeId;
use crate::tree::DomTree;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event type enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
    Load,
    DOMContentLoaded,
    Resize,
    Custom(String),
}

impl EventType {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "click" => EventType::Click,
            "keydown" => EventType::KeyDown,
            "keyup" => EventType::KeyUp,
            "focus" => EventType::Focus,
            "blur" => EventType::Blur,
            "load" => EventType::Load,
            "domcontentloaded" => EventType::DOMContentLoaded,
            "resize" => EventType::Resize,
            other => EventType::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Click => "click",
            EventType::KeyDown => "keydown",
            EventType::KeyUp => "keyup",
            EventType::Focus => "focus",
            EventType::Blur => "blur",
            EventType::Load => "load",
            EventType::DOMContentLoaded => "DOMContentLoaded",
            EventType::Resize => "resize",
            EventType::Custom(s) => s,
        }
    }

    /// Check if event bubbles by default.
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            EventType::Focus | EventType::Blur | EventType::Load | EventType::Resize
        )
    }
}

/// Event phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPhase {
    None = 0,
    AtTarget = 2,
    Bubbling = 3,
}

/// Where a listener is attached: the window, or a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTargetRef {
    Window,
    Node(NodeId),
}

/// DOM Event.
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    /// Node the event was dispatched to, `None` for window events.
    pub target: Option<NodeId>,
    /// Current target during propagation.
    pub current_target: Option<EventTargetRef>,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    /// Key for keyboard events.
    pub key: Option<String>,
    /// Whether the event was synthesized by script rather than the user agent.
    pub synthetic: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: f64,
}

impl Event {
    pub fn new(event_type: EventType) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
            * 1000.0;

        Self {
            bubbles: event_type.bubbles(),
            event_type,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            key: None,
            synthetic: false,
            timestamp,
        }
    }

    pub fn keyboard(event_type: EventType, key: &str) -> Self {
        let mut event = Self::new(event_type);
        event.key = Some(key.to_string());
        event
    }

    /// An event raised by script, e.g. a resize fired right after setup.
    pub fn synthetic(event_type: EventType) -> Self {
        let mut event = Self::new(event_type);
        event.synthetic = true;
        event
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Event listener callback. Listeners get the tree so they can update
/// classes, attributes and rendered sizes in response.
pub type EventCallback = Arc<dyn Fn(&mut Event, &mut DomTree) + Send + Sync>;

/// Handle returned by [`EventManager::add_listener`], used for removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Clone)]
struct EventListener {
    id: ListenerId,
    callback: EventCallback,
    once: bool,
}

/// Listener registry and dispatcher.
pub struct EventManager {
    listeners: HashMap<EventTargetRef, HashMap<String, Vec<EventListener>>>,
    /// Reverse index for removal by id.
    owners: HashMap<ListenerId, (EventTargetRef, String)>,
    next_id: u64,
}

impl EventManager {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            owners: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn add_listener(
        &mut self,
        target: EventTargetRef,
        event_type: &str,
        callback: EventCallback,
    ) -> ListenerId {
        self.insert(target, event_type, callback, false)
    }

    /// Add a listener that is removed after its first invocation.
    pub fn add_listener_once(
        &mut self,
        target: EventTargetRef,
        event_type: &str,
        callback: EventCallback,
    ) -> ListenerId {
        self.insert(target, event_type, callback, true)
    }

    fn insert(
        &mut self,
        target: EventTargetRef,
        event_type: &str,
        callback: EventCallback,
        once: bool,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.listeners
            .entry(target)
            .or_default()
            .entry(event_type.to_string())
            .or_default()
            .push(EventListener { id, callback, once });
        self.owners.insert(id, (target, event_type.to_string()));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let Some((target, event_type)) = self.owners.remove(&id) else {
            return false;
        };
        if let Some(by_type) = self.listeners.get_mut(&target) {
            if let Some(list) = by_type.get_mut(&event_type) {
                list.retain(|l| l.id != id);
                if list.is_empty() {
                    by_type.remove(&event_type);
                }
            }
            if by_type.is_empty() {
                self.listeners.remove(&target);
            }
        }
        true
    }

    pub fn listener_count(&self, target: EventTargetRef, event_type: &str) -> usize {
        self.listeners
            .get(&target)
            .and_then(|by_type| by_type.get(event_type))
            .map_or(0, Vec::len)
    }

    /// Total number of live listeners.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Dispatch an event. Node events run target listeners, then bubble
    /// through ancestors. Returns false if the default was prevented.
    pub fn dispatch(
        &mut self,
        tree: &mut DomTree,
        target: EventTargetRef,
        event: &mut Event,
    ) -> bool {
        tracing::trace!("dispatch {} to {:?}", event.event_type.as_str(), target);
        let path: Vec<EventTargetRef> = match target {
            EventTargetRef::Window => vec![EventTargetRef::Window],
            EventTargetRef::Node(node) => {
                event.target = Some(node);
                let mut path = vec![target];
                if event.bubbles {
                    path.extend(tree.ancestors(node).map(EventTargetRef::Node));
                }
                path
            }
        };

        for (depth, current) in path.into_iter().enumerate() {
            event.phase = if depth == 0 {
                EventPhase::AtTarget
            } else {
                EventPhase::Bubbling
            };
            event.current_target = Some(current);
            self.invoke_listeners(tree, current, event);
            if event.propagation_stopped {
                break;
            }
        }

        event.phase = EventPhase::None;
        !event.default_prevented
    }

    fn invoke_listeners(&mut self, tree: &mut DomTree, current: EventTargetRef, event: &mut Event) {
        let event_type = event.event_type.as_str().to_string();

        // Snapshot so callbacks run without borrowing the registry
        let snapshot: Vec<EventListener> = self
            .listeners
            .get(&current)
            .and_then(|by_type| by_type.get(&event_type))
            .cloned()
            .unwrap_or_default();

        for listener in snapshot {
            if !self.owners.contains_key(&listener.id) {
                continue;
            }
            (listener.callback)(event, tree);
            if listener.once {
                self.remove_listener(listener.id);
            }
        }
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementData, TagName};
    use parking_lot::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&'static str) -> EventCallback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let make = move |label: &'static str| -> EventCallback {
            let sink = sink.clone();
            Arc::new(move |_: &mut Event, _: &mut DomTree| sink.lock().push(label.to_string()))
        };
        (log, make)
    }

    #[test]
    fn test_event_type_from_str() {
        assert_eq!(EventType::from_str("click"), EventType::Click);
        assert_eq!(EventType::from_str("KEYDOWN"), EventType::KeyDown);
        assert_eq!(
            EventType::from_str("om-ready"),
            EventType::Custom("om-ready".to_string())
        );
        assert!(!EventType::Resize.bubbles());
    }

    #[test]
    fn test_dispatch_bubbles_to_ancestors() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let container = tree.create_element(ElementData::new(TagName::new("div")));
        let button = tree.create_element(ElementData::new(TagName::new("button")));
        tree.append_child(root, container);
        tree.append_child(container, button);

        let (log, make) = recorder();
        let mut events = EventManager::new();
        events.add_listener(EventTargetRef::Node(button), "click", make("button"));
        events.add_listener(EventTargetRef::Node(container), "click", make("container"));
        events.add_listener(EventTargetRef::Node(container), "keydown", make("key"));

        let mut click = Event::new(EventType::Click);
        assert!(events.dispatch(&mut tree, EventTargetRef::Node(button), &mut click));
        assert_eq!(*log.lock(), vec!["button", "container"]);
        assert_eq!(click.target, Some(button));
    }

    #[test]
    fn test_stop_propagation_and_prevent_default() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let container = tree.create_element(ElementData::new(TagName::new("div")));
        let button = tree.create_element(ElementData::new(TagName::new("button")));
        tree.append_child(root, container);
        tree.append_child(container, button);

        let (log, make) = recorder();
        let mut events = EventManager::new();
        events.add_listener(
            EventTargetRef::Node(button),
            "click",
            Arc::new(|event: &mut Event, _: &mut DomTree| {
                event.prevent_default();
                event.stop_propagation();
            }),
        );
        events.add_listener(EventTargetRef::Node(container), "click", make("container"));

        let mut click = Event::new(EventType::Click);
        assert!(!events.dispatch(&mut tree, EventTargetRef::Node(button), &mut click));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_remove_listener() {
        let mut tree = DomTree::new();
        let (log, make) = recorder();
        let mut events = EventManager::new();
        let id = events.add_listener(EventTargetRef::Window, "resize", make("resize"));
        assert_eq!(events.listener_count(EventTargetRef::Window, "resize"), 1);

        assert!(events.remove_listener(id));
        assert!(!events.remove_listener(id));
        assert!(events.is_empty());

        let mut resize = Event::new(EventType::Resize);
        events.dispatch(&mut tree, EventTargetRef::Window, &mut resize);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_once_listener_and_listener_mutating_tree() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let node = tree.create_element(ElementData::new(TagName::new("div")));
        tree.append_child(root, node);

        let mut events = EventManager::new();
        events.add_listener_once(
            EventTargetRef::Node(node),
            "keydown",
            Arc::new(move |_: &mut Event, tree: &mut DomTree| tree.add_class(node, "seen")),
        );

        let mut key = Event::keyboard(EventType::KeyDown, "Tab");
        events.dispatch(&mut tree, EventTargetRef::Node(node), &mut key);
        assert!(tree.get_element(node).map_or(false, |e| e.has_class("seen")));
        assert_eq!(events.listener_count(EventTargetRef::Node(node), "keydown"), 0);
    }
}

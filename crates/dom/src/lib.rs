//! DOM (Document Object Model) implementation.
//!
//! This crate provides the document tree the media player upgrades:
//! element data with cached id and class list, an arena tree with id
//! lookup, window-level and node-level event listeners that can be
//! removed by id, and a minimal layout model (rendered sizes) used by
//! responsive embeds.

pub mod attributes;
pub mod document;
pub mod element;
pub mod events;
pub mod node;
pub mod serializer;
pub mod tree;
pub mod window;

pub use attributes::AttributeMap;
pub use document::{Document, ReadyState};
pub use element::{ElementData, TagName};
pub use events::{
    Event, EventCallback, EventManager, EventPhase, EventTargetRef, EventType, ListenerId,
};
pub use node::{Node, NodeData, NodeId, NodeType};
pub use serializer::{serialize_node, serialize_pretty};
pub use tree::DomTree;
pub use window::Window;

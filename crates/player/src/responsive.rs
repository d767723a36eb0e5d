//! Responsive sizing for iframe players.
//!
//! The aspect ratio is taken once from the declared `width`/`height`
//! attributes, cached in the ratio attribute, and the raw attributes are
//! dropped. A window `resize` listener then sizes the iframe to its
//! parent's current width.

use crate::config::PlayerConfig;
use common::Size;
use dom::{Document, DomTree, Event, EventTargetRef, EventType, ListenerId, NodeId};
use std::sync::Arc;

/// Aspect ratio (height / width) declared on `element`. Falls back to a
/// previously cached ratio attribute.
pub fn declared_ratio(tree: &DomTree, element: NodeId, ratio_attribute: &str) -> Option<f64> {
    let elem = tree.get_element(element)?;
    match (elem.numeric_attribute("width"), elem.numeric_attribute("height")) {
        (Some(width), Some(height)) if width > 0.0 && height > 0.0 => Some(height / width),
        _ => elem
            .numeric_attribute(ratio_attribute)
            .filter(|ratio| *ratio > 0.0),
    }
}

/// Size `element` to its parent's width at `ratio`. Returns the applied size.
pub fn fit_to_parent(tree: &mut DomTree, element: NodeId, ratio: f64) -> Option<Size> {
    let parent = tree.parent(element)?;
    let width = tree.available_width(parent)?;
    let size = Size::from_width_and_ratio(width, ratio);

    tree.set_rendered_size(element, size);
    tree.set_attribute(
        element,
        "style",
        &format!("width: {}px; height: {}px;", size.width, size.height),
    );
    Some(size)
}

/// Enable responsive behavior for an iframe player. Returns the installed
/// window listener, or `None` if no ratio could be determined.
pub fn enable(doc: &mut Document, element: NodeId, config: &PlayerConfig) -> Option<ListenerId> {
    let Some(ratio) = declared_ratio(&doc.tree, element, &config.ratio_attribute) else {
        tracing::warn!("iframe has no usable width/height, responsive sizing disabled");
        return None;
    };

    doc.tree
        .set_attribute(element, &config.ratio_attribute, &ratio.to_string());
    doc.tree.remove_attribute(element, "height");
    doc.tree.remove_attribute(element, "width");

    let listener = doc.add_event_listener(
        EventTargetRef::Window,
        "resize",
        Arc::new(move |_: &mut Event, tree: &mut DomTree| {
            fit_to_parent(tree, element, ratio);
        }),
    );

    let mut initial = Event::synthetic(EventType::Resize);
    doc.dispatch_event(EventTargetRef::Window, &mut initial);

    Some(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iframe_in_container(doc: &mut Document, attrs: &str) -> (NodeId, NodeId) {
        let container = doc.create_element("div");
        let iframe = doc.create_element_with("iframe", attrs);
        doc.append_to_body(container);
        doc.tree.append_child(container, iframe);
        (container, iframe)
    }

    #[test]
    fn test_enable_caches_ratio_and_sizes() {
        let mut doc = Document::blank();
        let (container, iframe) = iframe_in_container(&mut doc, r#"height="90" width="160""#);
        let config = PlayerConfig::default();

        assert!(enable(&mut doc, iframe, &config).is_some());

        let elem = doc.tree.get_element(iframe).unwrap();
        assert!(!elem.has_attribute("height"));
        assert!(!elem.has_attribute("width"));
        assert_eq!(elem.get_attribute("data-ratio"), Some("0.5625"));
        // Initial synthesized resize used the viewport width
        assert_eq!(doc.tree.rendered_size(iframe), Some(Size::new(1280.0, 720.0)));

        doc.tree.set_rendered_size(container, Size::new(640.0, 0.0));
        doc.resize_viewport(1024, 768);
        let size = doc.tree.rendered_size(iframe).unwrap();
        assert_eq!(size.width, 640.0);
        assert_eq!(size.height, size.width * 0.5625);
        assert_eq!(
            doc.tree.get_element(iframe).unwrap().get_attribute("style"),
            Some("width: 640px; height: 360px;")
        );
    }

    #[test]
    fn test_missing_dimensions() {
        let mut doc = Document::blank();
        let (_, iframe) = iframe_in_container(&mut doc, r#"width="160""#);
        assert!(enable(&mut doc, iframe, &PlayerConfig::default()).is_none());
        assert!(doc.events.is_empty());
        assert!(doc.tree.get_element(iframe).unwrap().has_attribute("width"));
    }

    #[test]
    fn test_cached_ratio_is_reused() {
        let mut doc = Document::blank();
        let (_, iframe) = iframe_in_container(&mut doc, r#"data-ratio="0.75""#);
        assert_eq!(declared_ratio(&doc.tree, iframe, "data-ratio"), Some(0.75));
    }
}

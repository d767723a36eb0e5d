//! Candidate validation.

use browser_media::MediaKind;
use dom::{DomTree, NodeId};
use thiserror::Error;

/// Why an element was not upgraded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no element with id {0:?}")]
    Unresolved(String),

    #[error("node no longer exists")]
    NodeMissing,

    #[error("node is not an element")]
    NotAnElement,

    #[error("<{0}> cannot be upgraded")]
    UnsupportedKind(String),

    #[error("element lacks the {0:?} class")]
    MissingMarker(String),

    #[error("element is not attached to a parent")]
    Detached,

    #[error("player was destroyed")]
    Destroyed,
}

/// Check that `node` is an attached audio, video or iframe element
/// carrying `marker`. Never mutates the tree.
pub fn validate(tree: &DomTree, node: NodeId, marker: &str) -> Result<MediaKind, ValidationError> {
    let data = tree.get(node).ok_or(ValidationError::NodeMissing)?;
    let elem = data.as_element().ok_or(ValidationError::NotAnElement)?;

    let kind = MediaKind::from_tag(elem.tag_name.as_str())
        .ok_or_else(|| ValidationError::UnsupportedKind(elem.tag_name.to_string()))?;

    if !elem.has_class(marker) {
        return Err(ValidationError::MissingMarker(marker.to_string()));
    }
    if data.parent.is_none() {
        return Err(ValidationError::Detached);
    }
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::ElementData;

    fn attached(tree: &mut DomTree, tag: &str, attrs: &str) -> NodeId {
        let node = tree.create_element(ElementData::parse(tag, attrs));
        let root = tree.root();
        tree.append_child(root, node);
        node
    }

    #[test]
    fn test_accepts_media_kinds() {
        let mut tree = DomTree::new();
        for (tag, kind) in [
            ("audio", MediaKind::Audio),
            ("video", MediaKind::Video),
            ("iframe", MediaKind::Iframe),
        ] {
            let node = attached(&mut tree, tag, r#"class="om-player""#);
            assert_eq!(validate(&tree, node, "om-player"), Ok(kind));
        }
    }

    #[test]
    fn test_rejections() {
        let mut tree = DomTree::new();
        let div = attached(&mut tree, "div", r#"class="om-player""#);
        let plain = attached(&mut tree, "video", "");
        let text = tree.create_text("x".into());
        let detached = tree.create_element(ElementData::parse("video", r#"class="om-player""#));

        assert_eq!(
            validate(&tree, div, "om-player"),
            Err(ValidationError::UnsupportedKind("div".into()))
        );
        assert_eq!(
            validate(&tree, plain, "om-player"),
            Err(ValidationError::MissingMarker("om-player".into()))
        );
        assert_eq!(validate(&tree, text, "om-player"), Err(ValidationError::NotAnElement));
        assert_eq!(validate(&tree, detached, "om-player"), Err(ValidationError::Detached));

        tree.remove(plain);
        assert_eq!(validate(&tree, plain, "om-player"), Err(ValidationError::NodeMissing));
    }
}

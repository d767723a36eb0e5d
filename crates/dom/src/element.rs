//! DOM Element implementation.

use crate::attributes::AttributeMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Interned, lowercase tag name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagName(Arc<str>);

impl TagName {
    pub fn new(name: &str) -> Self {
        static INTERNED: Lazy<RwLock<HashMap<String, Arc<str>>>> =
            Lazy::new(|| RwLock::new(HashMap::new()));

        let lower = name.to_ascii_lowercase();

        if let Some(s) = INTERNED.read().get(&lower) {
            return TagName(s.clone());
        }

        let mut cache = INTERNED.write();
        let s = cache
            .entry(lower.clone())
            .or_insert_with(|| Arc::from(lower.as_str()))
            .clone();
        TagName(s)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn html() -> Self {
        Self::new("html")
    }
    pub fn head() -> Self {
        Self::new("head")
    }
    pub fn body() -> Self {
        Self::new("body")
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TagName {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for TagName {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

/// Element-specific data.
#[derive(Clone, Debug)]
pub struct ElementData {
    /// Tag name (lowercase).
    pub tag_name: TagName,
    /// Attributes, in source order.
    pub attributes: AttributeMap,
    /// ID attribute (cached).
    pub id: Option<Arc<str>>,
    /// Class list (cached).
    pub class_list: SmallVec<[Arc<str>; 4]>,
}

impl ElementData {
    pub fn new(tag_name: TagName) -> Self {
        Self {
            tag_name,
            attributes: AttributeMap::new(),
            id: None,
            class_list: SmallVec::new(),
        }
    }

    /// Build an element from a tag and an HTML attribute string,
    /// e.g. `ElementData::parse("video", r#"class="om-player" id="intro""#)`.
    pub fn parse(tag: &str, attrs: &str) -> Self {
        let mut elem = Self::new(TagName::new(tag));
        let parsed = AttributeMap::parse(attrs);
        for (name, value) in parsed.iter() {
            elem.set_attribute(name, value);
        }
        elem
    }

    /// Set an attribute, updating cached values.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name_lower = name.to_ascii_lowercase();

        match name_lower.as_str() {
            "id" => self.id = Some(Arc::from(value)),
            "class" => {
                self.class_list = value.split_whitespace().map(Arc::from).collect();
            }
            _ => {}
        }

        self.attributes.set(&name_lower, value);
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let name_lower = name.to_ascii_lowercase();

        match name_lower.as_str() {
            "id" => self.id = None,
            "class" => self.class_list.clear(),
            _ => {}
        }

        self.attributes.remove(&name_lower)
    }

    #[inline]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_ascii_lowercase())
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(&name.to_ascii_lowercase())
    }

    /// Parse a numeric attribute such as `width="160"`.
    ///
    /// Accepts a trailing `px`; anything else that is not a finite number is `None`.
    pub fn numeric_attribute(&self, name: &str) -> Option<f64> {
        let raw = self.get_attribute(name)?.trim();
        let raw = raw.strip_suffix("px").unwrap_or(raw);
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list.iter().any(|c| c.as_ref() == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.class_list.push(Arc::from(class));
            self.update_class_attribute();
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        if let Some(pos) = self.class_list.iter().position(|c| c.as_ref() == class) {
            self.class_list.remove(pos);
            self.update_class_attribute();
        }
    }

    fn update_class_attribute(&mut self) {
        if self.class_list.is_empty() {
            self.attributes.remove("class");
            return;
        }
        let class_str = self
            .class_list
            .iter()
            .map(|c| c.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        self.attributes.set("class", &class_str);
    }
}

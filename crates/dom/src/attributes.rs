//! DOM Attribute handling.

use indexmap::IndexMap;
use std::sync::Arc;

/// Map of element attributes preserving insertion order.
#[derive(Clone, Debug, Default)]
pub struct AttributeMap {
    attrs: IndexMap<Arc<str>, String>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.attrs.insert(Arc::from(name), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    /// Remove an attribute. Remaining attributes keep their order.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Parse the attribute part of a start tag (`id="a" class='b c' muted src=x.mp4`).
    pub fn parse(input: &str) -> Self {
        let mut map = Self::new();
        let mut rest = input.trim_start();

        while !rest.is_empty() {
            let name_end = rest
                .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
                .unwrap_or(rest.len());
            if name_end == 0 {
                // Stray delimiter
                rest = rest[1..].trim_start();
                continue;
            }
            let name = rest[..name_end].to_ascii_lowercase();
            rest = rest[name_end..].trim_start();

            let value = match rest.strip_prefix('=') {
                Some(after_eq) => {
                    let after_eq = after_eq.trim_start();
                    let (value, remaining) = take_value(after_eq);
                    rest = remaining;
                    value
                }
                None => String::new(),
            };

            map.set(&name, &value);
            rest = rest.trim_start();
        }

        map
    }

    /// Convert to HTML attribute string.
    pub fn to_html(&self) -> String {
        self.attrs
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    name.to_string()
                } else {
                    format!("{}=\"{}\"", name, html_escape(value))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn take_value(input: &str) -> (String, &str) {
    match input.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &input[1..];
            match body.find(quote) {
                Some(end) => (body[..end].to_string(), &body[end + 1..]),
                None => (body.to_string(), ""),
            }
        }
        Some(_) => {
            let end = input
                .find(|c: char| c.is_whitespace() || c == '>')
                .unwrap_or(input.len());
            (input[..end].to_string(), &input[end..])
        }
        None => (String::new(), input),
    }
}

/// Escape HTML special characters in an attribute value.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

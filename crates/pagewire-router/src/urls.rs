//! Ordered, case-insensitive registry of navigation links
//!
//! The registry never touches a document directly. Links are reached through
//! the [`LinkElement`] trait, which the application crate implements for its
//! element handle and tests implement with plain structs.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::slug::normalize_key;
use crate::{RegistryError, EXTERNAL_PREFIX, ROUTE_PREFIX};

/// What the registry needs from a link element
///
/// Handles are cheap clones sharing one underlying node, so every mutator
/// takes `&self`.
pub trait LinkElement: Clone + 'static {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn set_style_property(&self, name: &str, value: &str);
    /// Detaches the element from its parent
    fn remove(&self);
    fn add_click_listener(&self, callback: Box<dyn Fn()>);
}

/// Declarative description of one link
///
/// `name` is the registry key; when it is missing the visible text is used.
/// Styles are CSS declarations such as `"color: red"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkOptions {
    pub name: Option<String>,
    pub href: String,
    pub text: Option<String>,
    pub external: bool,
    pub hide: bool,
    #[serde(alias = "class")]
    pub classes: Vec<String>,
    pub id: Option<String>,
    #[serde(alias = "style")]
    pub styles: Vec<String>,
}

impl LinkOptions {
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The key this link is registered under
    fn key(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.text.as_deref().filter(|t| !t.is_empty()))
    }
}

enum FieldKind {
    String,
    Bool,
    StringList,
}

impl FieldKind {
    fn of(field: &str) -> Option<Self> {
        match field {
            "name" | "href" | "text" | "id" => Some(FieldKind::String),
            "external" | "hide" => Some(FieldKind::Bool),
            "classes" | "class" | "styles" | "style" => Some(FieldKind::StringList),
            _ => None,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Bool => "a boolean",
            FieldKind::StringList => "a list of strings",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string() || value.is_null(),
            FieldKind::Bool => value.is_boolean() || value.is_null(),
            FieldKind::StringList => match value {
                Value::Array(items) => items.iter().all(Value::is_string),
                Value::Null => true,
                _ => false,
            },
        }
    }
}

/// Checks one loosely typed link entry and converts it
fn link_from_value(index: usize, value: &Value) -> Result<LinkOptions, RegistryError> {
    let Value::Object(fields) = value else {
        return Err(RegistryError::InvalidFieldType {
            index,
            field: String::new(),
            expected: "an object",
        });
    };

    for (field, value) in fields {
        let kind = FieldKind::of(field).ok_or_else(|| RegistryError::UnknownField {
            index,
            field: field.clone(),
        })?;
        if !kind.accepts(value) {
            return Err(RegistryError::InvalidFieldType {
                index,
                field: field.clone(),
                expected: kind.expected(),
            });
        }
    }

    // Nulls are accepted above; drop them so serde falls back to defaults
    let cleaned: serde_json::Map<String, Value> = fields
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    serde_json::from_value(Value::Object(cleaned)).map_err(|_| RegistryError::InvalidFieldType {
        index,
        field: String::new(),
        expected: "a link object",
    })
}

/// Ordered map from case-normalized keys to link elements
///
/// Iteration follows insertion order. The order list and the map always hold
/// the same keys.
#[derive(Debug, Clone)]
pub struct UrlRegistry<E: LinkElement> {
    urls: HashMap<String, E>,
    order: Vec<String>,
}

impl<E: LinkElement> Default for UrlRegistry<E> {
    fn default() -> Self {
        Self {
            urls: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<E: LinkElement> UrlRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, key: &str, element: E) -> Result<(), RegistryError> {
        let normalized = normalize_key(key);
        if self.urls.contains_key(&normalized) {
            return Err(RegistryError::DuplicateKey { key: normalized });
        }
        debug!(key = %normalized, "registered url");
        self.urls.insert(normalized.clone(), element);
        self.order.push(normalized);
        Ok(())
    }

    fn insert_link(&mut self, key: &str, element: E, external: bool) -> Result<(), RegistryError> {
        if self.contains(key) {
            return Err(RegistryError::DuplicateKey {
                key: normalize_key(key),
            });
        }

        if !external {
            let href = element.attribute("href").unwrap_or_default();
            if !href.starts_with(ROUTE_PREFIX) {
                element.set_attribute("href", &format!("{}{}", ROUTE_PREFIX, href));
            }
        }
        if element.text().is_empty() {
            element.set_text(key);
        }
        self.insert(key, element)
    }

    /// Registers a router-internal link
    ///
    /// The href gets the [`ROUTE_PREFIX`] and an empty text becomes the key.
    pub fn set(&mut self, key: &str, element: E) -> Result<(), RegistryError> {
        self.insert_link(key, element, false)
    }

    /// Registers a link the browser follows itself
    pub fn set_external(&mut self, key: &str, element: E) -> Result<(), RegistryError> {
        self.insert_link(key, element, true)
    }

    /// Registers an element without touching it
    pub fn set_raw(&mut self, key: &str, element: E) -> Result<(), RegistryError> {
        self.insert(key, element)
    }

    pub fn get(&self, key: &str) -> Option<&E> {
        self.urls.get(&normalize_key(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.urls.contains_key(&normalize_key(key))
    }

    /// Removes an entry and detaches its element from the document
    pub fn delete(&mut self, key: &str) -> Result<E, RegistryError> {
        let normalized = normalize_key(key);
        let element = self
            .urls
            .remove(&normalized)
            .ok_or_else(|| RegistryError::NotFound {
                key: normalized.clone(),
            })?;
        self.order.retain(|k| *k != normalized);
        element.remove();
        debug!(key = %normalized, "deleted url");
        Ok(element)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Normalized keys in insertion order
    pub fn keys(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &E)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.urls.get(key).map(|element| (key.as_str(), element)))
    }

    pub fn in_order(&self, reverse: bool) -> Vec<&E> {
        let elements = self.iter().map(|(_, element)| element);
        if reverse {
            elements.rev().collect()
        } else {
            elements.collect()
        }
    }

    pub fn for_each<F>(&self, mut f: F, reverse: bool)
    where
        F: FnMut(&str, &E),
    {
        if reverse {
            self.iter().rev().for_each(|(k, e)| f(k, e));
        } else {
            self.iter().for_each(|(k, e)| f(k, e));
        }
    }

    fn set_display(&self, display: &str, names: &[&str]) {
        if names.is_empty() {
            for element in self.urls.values() {
                element.set_style_property("display", display);
            }
            return;
        }
        for element in names.iter().filter_map(|name| self.get(name)) {
            element.set_style_property("display", display);
        }
    }

    /// Hides every link, or only the named ones
    pub fn hide(&self, names: &[&str]) {
        self.set_display("none", names);
    }

    /// Shows every link, or only the named ones, with the given `display`
    pub fn show(&self, display: &str, names: &[&str]) {
        self.set_display(display, names);
    }

    /// Attaches a click callback to every registered link
    pub fn on_click<F>(&self, f: F)
    where
        F: Fn(&E) + 'static,
    {
        let f = Rc::new(f);
        for element in self.urls.values() {
            let target = element.clone();
            let f = f.clone();
            element.add_click_listener(Box::new(move || f(&target)));
        }
    }

    /// Fails when any key is already taken or repeated
    fn check_new_keys<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), RegistryError> {
        let mut seen = HashSet::new();
        for key in keys {
            let normalized = normalize_key(key);
            if self.urls.contains_key(&normalized) || !seen.insert(normalized.clone()) {
                return Err(RegistryError::DuplicateKey { key: normalized });
            }
        }
        Ok(())
    }

    /// Registers existing elements keyed by their visible text
    ///
    /// With `raw` the elements are inserted untouched. Otherwise an href
    /// starting with [`EXTERNAL_PREFIX`] is stripped and the link registered
    /// as external; any other href is routed. Nothing is inserted if any key
    /// collides.
    pub fn from_elements(&mut self, raw: bool, elements: Vec<E>) -> Result<(), RegistryError> {
        let texts: Vec<String> = elements.iter().map(LinkElement::text).collect();
        self.check_new_keys(texts.iter().map(String::as_str))?;

        for (key, element) in texts.iter().zip(elements) {
            if raw {
                self.set_raw(key, element)?;
                continue;
            }
            let href = element.attribute("href").unwrap_or_default();
            match href.strip_prefix(EXTERNAL_PREFIX) {
                Some(target) => {
                    element.set_attribute("href", target);
                    self.set_external(key, element)?;
                }
                None => self.set(key, element)?,
            }
        }
        Ok(())
    }

    /// Builds and registers links from typed options
    ///
    /// `create` makes a fresh anchor element for every entry. Nothing is
    /// inserted if any entry lacks a key or collides.
    pub fn from_options<F>(
        &mut self,
        options: &[LinkOptions],
        mut create: F,
    ) -> Result<(), RegistryError>
    where
        F: FnMut() -> E,
    {
        let keys = options
            .iter()
            .enumerate()
            .map(|(index, option)| option.key().ok_or(RegistryError::MissingKey { index }))
            .collect::<Result<Vec<_>, _>>()?;
        self.check_new_keys(keys.iter().copied())?;

        for (key, option) in keys.into_iter().zip(options) {
            let element = create();
            element.set_attribute("href", &option.href);
            if let Some(text) = option.text.as_deref() {
                element.set_text(text);
            }
            if let Some(id) = option.id.as_deref().filter(|id| !id.is_empty()) {
                element.set_attribute("id", id);
            }
            if !option.classes.is_empty() {
                element.set_attribute("class", &option.classes.join(" "));
            }
            for declaration in &option.styles {
                if let Some((property, value)) = declaration.split_once(':') {
                    element.set_style_property(property.trim(), value.trim());
                }
            }
            if option.hide {
                element.set_style_property("display", "none");
            }

            if option.external {
                self.set_external(key, element)?;
            } else {
                self.set(key, element)?;
            }
        }
        Ok(())
    }

    /// Validates loosely typed link entries, then registers them
    ///
    /// Every entry is checked before anything is inserted.
    pub fn from_json<F>(&mut self, values: &[Value], create: F) -> Result<(), RegistryError>
    where
        F: FnMut() -> E,
    {
        let options = values
            .iter()
            .enumerate()
            .map(|(index, value)| link_from_value(index, value))
            .collect::<Result<Vec<_>, _>>()?;
        self.from_options(&options, create)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_options_alias_fields() {
        let value = json!({"name": "Home", "href": "/", "class": ["nav"], "style": ["color: red"]});
        let options = link_from_value(0, &value).unwrap();
        assert_eq!(options.classes, vec!["nav".to_string()]);
        assert_eq!(options.styles, vec!["color: red".to_string()]);
    }

    #[test]
    fn test_link_from_value_rejects_wrong_type() {
        let value = json!({"name": "Home", "external": "yes"});
        assert_eq!(
            link_from_value(3, &value),
            Err(RegistryError::InvalidFieldType {
                index: 3,
                field: "external".to_string(),
                expected: "a boolean",
            })
        );
    }

    #[test]
    fn test_link_from_value_rejects_unknown_field() {
        let value = json!({"name": "Home", "target": "_blank"});
        assert!(matches!(
            link_from_value(0, &value),
            Err(RegistryError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_link_key_falls_back_to_text() {
        let options = LinkOptions {
            text: Some("Blog".to_string()),
            ..LinkOptions::default()
        };
        assert_eq!(options.key(), Some("Blog"));
        assert_eq!(LinkOptions::default().key(), None);
    }
}

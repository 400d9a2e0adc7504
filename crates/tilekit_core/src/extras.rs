//! Document content the model does not interpret
//!
//! The editor writes more than a tileset descriptor needs: custom
//! properties, tile classes, tile offsets, transformation flags and so on.
//! Each modelled element keeps that content in an [`Extras`] so re-saving a
//! file gives it back unchanged. Positions record where an item sat among
//! its siblings, which lets the writer put it back in the same place.

use serde::{Deserialize, Serialize};

/// An XML element kept as-is, with its whole subtree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawElement {
    pub name: String,
    /// Attributes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    /// Character data, only kept when it carries something
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawElement>,
}

impl RawElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: RawElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check if this element has no content besides its attributes
    pub fn is_leaf(&self) -> bool {
        self.text.is_none() && self.children.is_empty()
    }
}

/// An unmodelled attribute and its index in the element's attribute list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraAttribute {
    pub position: usize,
    pub name: String,
    pub value: String,
}

/// An unmodelled child element and its index among the element's children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraElement {
    pub position: usize,
    pub element: RawElement,
}

/// Unmodelled attributes and children of one element, in document order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extras {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ExtraAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ExtraElement>,
}

impl Extras {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    pub fn push_attribute(
        &mut self,
        position: usize,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.attributes.push(ExtraAttribute {
            position,
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn push_child(&mut self, position: usize, element: RawElement) {
        self.children.push(ExtraElement { position, element });
    }

    /// Value of an unmodelled attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// First unmodelled child with the given element name
    pub fn child(&self, name: &str) -> Option<&RawElement> {
        self.children
            .iter()
            .map(|c| &c.element)
            .find(|e| e.name == name)
    }
}

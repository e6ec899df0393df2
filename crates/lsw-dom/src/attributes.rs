//! Element Attributes
//!
//! Generic (non-structural) attributes: get, set, remove, toggle.

use std::collections::HashMap;

use crate::{DomError, DomResult};

/// Whether `name` is a well-formed HTML attribute name.
///
/// Rejects the empty name, whitespace and control characters, and the
/// characters that would end the name or the tag when serialized
/// (`"`, `'`, `<`, `>`, `/`, `=`), plus Unicode noncharacters.
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && !matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
                && !is_noncharacter(c)
        })
}

fn is_noncharacter(c: char) -> bool {
    let code = c as u32;
    (0xFDD0..=0xFDEF).contains(&code) || (code & 0xFFFE) == 0xFFFE
}

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            value: value.into(),
        }
    }

    /// `data-*` attribute
    pub fn is_data(&self) -> bool {
        self.name.starts_with("data-")
    }
}

/// Named node map (attribute collection), insertion ordered
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
    by_name: HashMap<String, usize>,
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of attributes
    pub fn length(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.by_name
            .get(&name)
            .and_then(|&i| self.attributes.get(i))
            .map(|a| a.value.as_str())
    }

    /// Set attribute, returning the previous value
    pub fn set_named_item(&mut self, attr: Attr) -> DomResult<Option<Attr>> {
        if !is_valid_attribute_name(&attr.name) {
            return Err(DomError::InvalidAttributeName(attr.name));
        }
        if let Some(&index) = self.by_name.get(&attr.name) {
            Ok(Some(std::mem::replace(&mut self.attributes[index], attr)))
        } else {
            self.by_name.insert(attr.name.clone(), self.attributes.len());
            self.attributes.push(attr);
            Ok(None)
        }
    }

    /// Set attribute by name/value
    pub fn set_attribute(&mut self, name: &str, value: &str) -> DomResult<()> {
        self.set_named_item(Attr::new(name, value))?;
        Ok(())
    }

    /// Remove attribute by name
    pub fn remove_named_item(&mut self, name: &str) -> Option<Attr> {
        let name = name.to_ascii_lowercase();
        let index = self.by_name.remove(&name)?;
        for idx in self.by_name.values_mut() {
            if *idx > index {
                *idx -= 1;
            }
        }
        Some(self.attributes.remove(index))
    }

    /// Check if attribute exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_ascii_lowercase())
    }

    /// Toggle a boolean attribute, returns whether it is now present
    pub fn toggle_attribute(&mut self, name: &str, force: Option<bool>) -> DomResult<bool> {
        let present = self.has_attribute(name);
        let want = force.unwrap_or(!present);
        if want && !present {
            self.set_attribute(name, "")?;
        } else if !want && present {
            self.remove_named_item(name);
        }
        Ok(want)
    }

    /// Iterate over attributes
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}

//! Attribute maps for element construction
//!
//! Keys are classified once, when the map is built, so the renderer applies
//! each entry by its kind instead of sniffing strings while mutating the tree.

use lsw_dom::{is_valid_attribute_name, ElementData};

use crate::{RenderError, RenderResult};

/// Raw attribute value as supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Plain string value
    Text(String),
    /// Property/value pairs (only meaningful for `style`)
    Map(Vec<(String, String)>),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One resolved attribute entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// `style` given as property map
    StyleMap(Vec<(String, String)>),
    /// `style` given as raw css text
    StyleText(String),
    /// `data-*` attribute (full name kept)
    Data { name: String, value: String },
    /// `className` / `class`
    ClassName(String),
    /// `id`
    Id(String),
    /// Anything else
    Other { name: String, value: String },
}

impl Attribute {
    /// Classify a key/value pair. Keys that are not well-formed attribute
    /// names are rejected.
    pub fn resolve(key: &str, value: AttrValue) -> RenderResult<Self> {
        let value = match (key, value) {
            ("style", AttrValue::Map(pairs)) => return Ok(Self::StyleMap(pairs)),
            ("style", AttrValue::Text(text)) => return Ok(Self::StyleText(text)),
            (_, AttrValue::Text(text)) => text,
            (_, AttrValue::Map(pairs)) => pairs
                .into_iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect::<Vec<_>>()
                .join(";"),
        };
        let attribute = match key {
            "className" | "class" => Self::ClassName(value),
            "id" => Self::Id(value),
            _ if !is_valid_attribute_name(key) => return Err(RenderError::InvalidAttribute(key.to_string())),
            _ if key.starts_with("data-") => Self::Data { name: key.to_string(), value },
            _ => Self::Other { name: key.to_string(), value },
        };
        Ok(attribute)
    }

    /// Apply to an element. Event handler attributes (`on*`) are dropped.
    pub(crate) fn apply(&self, elem: &mut ElementData) -> RenderResult<()> {
        match self {
            Self::StyleMap(pairs) => {
                for (name, value) in pairs {
                    elem.style.set_property(name, value);
                }
            }
            Self::StyleText(text) => elem.style.set_css_text(text),
            Self::Data { name, value } => {
                if !is_valid_attribute_name(name) {
                    return Err(RenderError::InvalidAttribute(name.clone()));
                }
                elem.attrs.set_attribute(name, value)?;
            }
            Self::ClassName(value) => elem.set_class_name(value),
            Self::Id(value) => elem.id = Some(value.clone()),
            Self::Other { name, value } => {
                if !is_valid_attribute_name(name) {
                    return Err(RenderError::InvalidAttribute(name.clone()));
                }
                if is_event_handler(name) {
                    tracing::warn!(attribute = %name, tag = %elem.tag, "dropping event handler attribute");
                    return Ok(());
                }
                elem.set_attribute(name, value)?;
            }
        }
        Ok(())
    }
}

fn is_event_handler(name: &str) -> bool {
    name.len() > 2 && name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on"))
}

/// Ordered attribute map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw key/value pairs; fails on the first malformed key
    pub fn from_pairs<I, K, V>(pairs: I) -> RenderResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| Attribute::resolve(k.as_ref(), v.into()))
            .collect::<RenderResult<_>>()?;
        Ok(Self { entries })
    }

    /// Shorthand for a map holding only `className`
    pub fn class(class_name: &str) -> Self {
        Self::new().class_name(class_name)
    }

    pub fn class_name(mut self, value: &str) -> Self {
        self.entries.push(Attribute::ClassName(value.to_string()));
        self
    }

    pub fn id(mut self, value: &str) -> Self {
        self.entries.push(Attribute::Id(value.to_string()));
        self
    }

    /// `data-<name>`; the prefix is added when missing
    pub fn data(mut self, name: &str, value: impl ToString) -> RenderResult<Self> {
        let name = if name.starts_with("data-") {
            name.to_string()
        } else {
            format!("data-{name}")
        };
        if !is_valid_attribute_name(&name) {
            return Err(RenderError::InvalidAttribute(name));
        }
        self.entries.push(Attribute::Data { name, value: value.to_string() });
        Ok(self)
    }

    pub fn style<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = properties.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.entries.push(Attribute::StyleMap(pairs));
        self
    }

    pub fn style_text(mut self, css: &str) -> Self {
        self.entries.push(Attribute::StyleText(css.to_string()));
        self
    }

    /// Any other attribute; routed through [`Attribute::resolve`]
    pub fn attr(mut self, name: &str, value: impl ToString) -> RenderResult<Self> {
        self.entries.push(Attribute::resolve(name, AttrValue::Text(value.to_string()))?);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter()
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

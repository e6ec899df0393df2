//! DOM Node
//!
//! Nodes link to each other through [`NodeId`]s rather than pointers, so the
//! whole tree lives in one arena and detached nodes are just unlinked slots.

use crate::{CssStyleDeclaration, DOMTokenList, DomResult, NamedNodeMap, NodeId};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn unlinked(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::unlinked(NodeData::Element(ElementData::new(tag)))
    }

    /// Element node from already configured element data
    pub fn from_element(data: ElementData) -> Self {
        Self::unlinked(NodeData::Element(data))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::unlinked(NodeData::Text(TextData { content }))
    }

    /// Create a comment node
    pub fn comment(content: String) -> Self {
        Self::unlinked(NodeData::Comment(content))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::unlinked(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }

    /// Whether the node has any children
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_valid()
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
///
/// `id`, `class` and `style` are kept out of the generic attribute map so
/// they can be manipulated structurally; [`ElementData::attribute`] still
/// answers for them by name.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lower-case tag name
    pub tag: String,
    /// Element id
    pub id: Option<String>,
    /// Class list
    pub classes: DOMTokenList,
    /// Inline style
    pub style: CssStyleDeclaration,
    /// Every other attribute, in insertion order
    pub attrs: NamedNodeMap,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: DOMTokenList::new(),
            style: CssStyleDeclaration::new(),
            attrs: NamedNodeMap::new(),
        }
    }

    /// Get an attribute value by name, including the structural ones
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" => (!self.classes.is_empty()).then(|| self.classes.value()),
            "style" => (!self.style.is_empty()).then(|| self.style.css_text()),
            _ => self.attrs.get_attribute(name).map(str::to_string),
        }
    }

    /// Set an attribute, routing the structural names to their fields
    pub fn set_attribute(&mut self, name: &str, value: &str) -> DomResult<()> {
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => self.classes = DOMTokenList::from_string(value),
            "style" => self.style.set_css_text(value),
            _ => self.attrs.set_attribute(name, value)?,
        }
        Ok(())
    }

    /// Check if the element has an attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        match name {
            "id" => self.id.is_some(),
            "class" => !self.classes.is_empty(),
            "style" => !self.style.is_empty(),
            _ => self.attrs.has_attribute(name),
        }
    }

    /// `className` property setter
    pub fn set_class_name(&mut self, value: &str) {
        self.classes = DOMTokenList::from_string(value);
    }

    /// `disabled` property
    pub fn is_disabled(&self) -> bool {
        self.attrs.has_attribute("disabled")
    }

    pub fn set_disabled(&mut self, disabled: bool) -> DomResult<()> {
        self.attrs.toggle_attribute("disabled", Some(disabled))?;
        Ok(())
    }
}

/// Text node data
#[derive(Debug, Clone)]
pub struct TextData {
    pub content: String,
}

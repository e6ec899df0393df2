//! Logic Stories DOM
//!
//! Arena-allocated node tree used by the secure renderer. Nodes are
//! addressed by [`NodeId`]; text is stored verbatim and only escaped
//! when the tree is serialized.

mod attributes;
mod classlist;
mod document;
mod node;
mod operations;
mod serializer;
mod style;
mod tags;
mod tree;

pub use attributes::{is_valid_attribute_name, Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use document::Document;
pub use node::{ElementData, Node, NodeData, TextData};
pub use operations::{DomError, DomResult};
pub use serializer::{escape_attribute, escape_text, HtmlSerializer};
pub use style::CssStyleDeclaration;
pub use tags::{is_known_tag, KNOWN_TAGS};
pub use tree::{Children, DomTree};

/// Node identifier: arena slot plus the slot's generation, so an id kept
/// past the release of its node never resolves to whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId { index: 0, generation: 0 };

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId { index: u32::MAX, generation: 0 };

    /// Whether this id refers to a slot at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self.index != u32::MAX
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}v{}", self.index, self.generation)
        } else {
            f.write_str("#none")
        }
    }
}

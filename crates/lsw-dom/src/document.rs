//! Document - High-level document API

use url::Url;

use crate::{DomResult, DomTree, HtmlSerializer, NodeId};

/// Base for document URLs given without scheme and host
const RELATIVE_BASE: &str = "http://localhost/";

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: Option<Url>,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a document with `<html><head></head><body></body></html>`.
    ///
    /// Relative URLs (`admin-login.html`, `/signin.html`) resolve against
    /// the site root; an unparsable URL leaves the document without one.
    pub fn new(url: &str) -> Self {
        let (tree, html, head, body) = DomTree::with_html_skeleton();
        let url = match parse_document_url(url) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(url, error = %e, "unparsable document URL");
                None
            }
        };

        Self {
            tree,
            url,
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Get document URL (`about:blank` when none could be parsed)
    pub fn url(&self) -> &str {
        self.url.as_ref().map_or("about:blank", Url::as_str)
    }

    /// Path component of the document URL (`/admin.html` for `https://x/admin.html?a`).
    ///
    /// Opaque URLs such as `about:blank` have the root path.
    pub fn path(&self) -> &str {
        match &self.url {
            Some(url) if !url.cannot_be_a_base() => url.path(),
            _ => "/",
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Create an element and append it to `parent` with the given id
    pub fn append_element_with_id(&mut self, parent: NodeId, tag: &str, id: &str) -> DomResult<NodeId> {
        let node = self.tree.create_element(tag);
        if let Some(elem) = self.tree.get_mut(node).and_then(|n| n.as_element_mut()) {
            elem.id = Some(id.to_string());
        }
        self.tree.append_child(parent, node)
    }

    /// Get element by ID (depth-first, document order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_element_with_id(self.tree.root(), id)
    }

    fn find_element_with_id(&self, start: NodeId, target: &str) -> Option<NodeId> {
        for (node_id, node) in self.tree.children(start) {
            if node.as_element().and_then(|e| e.id.as_deref()) == Some(target) {
                return Some(node_id);
            }
            if let Some(found) = self.find_element_with_id(node_id, target) {
                return Some(found);
            }
        }
        None
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Serialized document
    pub fn to_html(&self) -> String {
        HtmlSerializer::new().serialize_inner(&self.tree, self.tree.root())
    }
}

fn parse_document_url(url: &str) -> Result<Url, url::ParseError> {
    match Url::parse(url) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)?.join(url),
        other => other,
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

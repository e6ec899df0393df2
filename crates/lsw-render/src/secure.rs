//! Secure content renderer
//!
//! Safe replacements for `innerHTML` style writes. Every string that reaches
//! the tree becomes a text node; markup is only ever produced by the
//! serializer, which escapes it.

use lsw_dom::{is_known_tag, Document, DomTree, ElementData, HtmlSerializer, NodeData, NodeId};

use crate::{Attributes, RenderError, RenderResult};

/// An item to insert into a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Existing node, moved into the container
    Node(NodeId),
    /// Literal text, inserted as a text node
    Text(String),
}

impl From<NodeId> for Content {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Canned container states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Loading,
    Error,
    Empty,
}

impl Placeholder {
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Loading => "Loading...",
            Self::Error => "An error occurred",
            Self::Empty => "No data found",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Loading | Self::Empty => "text-center text-gray-400",
            Self::Error => "text-center text-red-400",
        }
    }
}

/// Renderer owning the page document
#[derive(Debug, Clone, Default)]
pub struct SecureDom {
    document: Document,
    /// Elements created inside the innermost [`SecureDom::build`] scope
    created: Option<Vec<NodeId>>,
}

impl SecureDom {
    pub fn new(document: Document) -> Self {
        Self { document, created: None }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    fn tree_mut(&mut self) -> &mut DomTree {
        self.document.tree_mut()
    }

    /// Set the visible text of `container` to exactly `text` (empty when absent)
    pub fn set_text(&mut self, container: NodeId, text: Option<&str>) -> RenderResult<()> {
        self.tree_mut().set_text_content(container, text.unwrap_or_default())?;
        Ok(())
    }

    /// Create a detached element of kind `tag` configured from `attributes`.
    ///
    /// Nothing is allocated when the tag or an attribute is rejected.
    pub fn create_element(
        &mut self,
        tag: &str,
        attributes: &Attributes,
        text: Option<&str>,
    ) -> RenderResult<NodeId> {
        if !is_known_tag(tag) {
            return Err(RenderError::InvalidTag(tag.to_string()));
        }
        let mut elem = ElementData::new(tag);
        for attribute in attributes.iter() {
            attribute.apply(&mut elem)?;
        }

        let tree = self.tree_mut();
        let node = tree.create_element_from(elem);
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            let text_node = tree.create_text(text);
            tree.append_child(node, text_node)?;
        }
        if let Some(created) = self.created.as_mut() {
            created.push(node);
        }
        Ok(node)
    }

    /// Run a multi-node render.
    ///
    /// When `render` fails, every element it created that is still detached
    /// is released together with its subtree. Nodes already attached to the
    /// page stay. Scopes nest: a successful inner scope hands its elements
    /// to the enclosing one.
    pub fn build<T, F>(&mut self, render: F) -> RenderResult<T>
    where
        F: FnOnce(&mut Self) -> RenderResult<T>,
    {
        let outer = self.created.replace(Vec::new());
        let result = render(self);
        let created = std::mem::replace(&mut self.created, outer).unwrap_or_default();

        match result {
            Ok(value) => {
                if let Some(outer) = self.created.as_mut() {
                    outer.extend(created);
                }
                Ok(value)
            }
            Err(e) => {
                self.release_detached(&created);
                Err(e)
            }
        }
    }

    fn release_detached(&mut self, nodes: &[NodeId]) {
        let tree = self.tree_mut();
        let mut released = 0;
        for &node in nodes {
            if tree.contains(node) && tree.parent(node).is_none() && tree.release(node).is_ok() {
                released += 1;
            }
        }
        tracing::debug!(released, "released nodes of failed render");
    }

    /// Discard every child of `container` and append `contents` in order.
    ///
    /// All items are validated before the container is touched; on error the
    /// old content is left in place.
    pub fn replace_content<I>(&mut self, container: NodeId, contents: I) -> RenderResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        let contents: Vec<Content> = contents.into_iter().map(Into::into).collect();
        self.validate(container, &contents)?;

        // Detach incoming nodes first so clearing cannot release one of them.
        for content in &contents {
            if let Content::Node(node) = content {
                self.tree_mut().detach(*node)?;
            }
        }
        let removed = self.tree_mut().clear_children(container)?;
        tracing::debug!(%container, removed, added = contents.len(), "replaced content");
        self.insert_all(container, contents)
    }

    /// Append `contents` in order, keeping existing children
    pub fn append_content<I>(&mut self, container: NodeId, contents: I) -> RenderResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        let contents: Vec<Content> = contents.into_iter().map(Into::into).collect();
        self.validate(container, &contents)?;
        self.insert_all(container, contents)
    }

    fn validate(&self, container: NodeId, contents: &[Content]) -> RenderResult<()> {
        let tree = self.tree();
        match tree.get(container).map(|n| &n.data) {
            Some(NodeData::Element(_) | NodeData::Document) => {}
            Some(_) => return Err(lsw_dom::DomError::InvalidNodeType(container).into()),
            None => return Err(lsw_dom::DomError::NotFound(container).into()),
        }
        for content in contents {
            if let Content::Node(node) = content {
                tree.ensure_insertable(container, *node)?;
            }
        }
        Ok(())
    }

    fn insert_all(&mut self, container: NodeId, contents: Vec<Content>) -> RenderResult<()> {
        let tree = self.tree_mut();
        for content in contents {
            let node = match content {
                Content::Node(node) => node,
                Content::Text(text) => tree.create_text(text),
            };
            tree.append_child(container, node)?;
        }
        Ok(())
    }

    /// Replace the container's content with a single styled message
    pub fn set_placeholder(
        &mut self,
        container: NodeId,
        placeholder: Placeholder,
        message: Option<&str>,
    ) -> RenderResult<NodeId> {
        let message = message.unwrap_or(placeholder.default_message());
        self.build(|dom| {
            let div = dom.create_element("div", &Attributes::class(placeholder.class_name()), Some(message))?;
            dom.replace_content(container, [div])?;
            Ok(div)
        })
    }

    pub fn set_loading_state(&mut self, container: NodeId, message: Option<&str>) -> RenderResult<NodeId> {
        self.set_placeholder(container, Placeholder::Loading, message)
    }

    pub fn set_error_state(&mut self, container: NodeId, message: Option<&str>) -> RenderResult<NodeId> {
        self.set_placeholder(container, Placeholder::Error, message)
    }

    pub fn set_empty_state(&mut self, container: NodeId, message: Option<&str>) -> RenderResult<NodeId> {
        self.set_placeholder(container, Placeholder::Empty, message)
    }

    /// Remove a node from the page and free it
    pub fn remove(&mut self, node: NodeId) -> RenderResult<()> {
        self.tree_mut().release(node)?;
        Ok(())
    }

    /// Whether `node` is currently a child of `container`
    pub fn is_child(&self, container: NodeId, node: NodeId) -> bool {
        self.tree().contains(node) && self.tree().parent(node) == Some(container)
    }

    pub fn children(&self, container: NodeId) -> Vec<NodeId> {
        self.tree().child_ids(container)
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.tree().get(node).and_then(|n| n.as_element())
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        self.tree_mut().get_mut(node).and_then(|n| n.as_element_mut())
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree().text_content(node)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        HtmlSerializer::new().serialize_inner(self.tree(), node)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        HtmlSerializer::new().serialize_outer(self.tree(), node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (SecureDom, NodeId) {
        let mut dom = SecureDom::default();
        let body = dom.document().body();
        let container = dom.create_element("div", &Attributes::new().id("c"), None).unwrap();
        dom.append_content(body, [container]).unwrap();
        (dom, container)
    }

    #[test]
    fn test_set_text_is_literal() {
        let (mut dom, c) = page();
        let hostile = "<b onclick=\"x()\">&amp;</b>";
        dom.set_text(c, Some(hostile)).unwrap();

        let children = dom.children(c);
        assert_eq!(children.len(), 1);
        assert!(dom.tree().get(children[0]).unwrap().is_text());
        assert_eq!(dom.text_content(c), hostile);
        assert_eq!(dom.inner_html(c), "&lt;b onclick=&quot;x()&quot;&gt;&amp;amp;&lt;/b&gt;");
    }

    #[test]
    fn test_set_text_absent_clears() {
        let (mut dom, c) = page();
        dom.set_text(c, Some("x")).unwrap();
        dom.set_text(c, None).unwrap();
        assert!(dom.children(c).is_empty());
        assert_eq!(dom.text_content(c), "");
    }

    #[test]
    fn test_create_element_style_map_and_text() {
        let (mut dom, _) = page();
        let div = dom
            .create_element("div", &Attributes::new().style([("color", "red")]), Some("hi"))
            .unwrap();
        let elem = dom.element(div).unwrap();
        assert_eq!(elem.style.get_property_value("color"), Some("red"));
        assert_eq!(dom.text_content(div), "hi");
        assert_eq!(dom.outer_html(div), "<div style=\"color: red;\">hi</div>");
    }

    #[test]
    fn test_create_element_without_text_is_childless() {
        let (mut dom, _) = page();
        let a = dom.create_element("span", &Attributes::new(), None).unwrap();
        let b = dom.create_element("span", &Attributes::new(), Some("")).unwrap();
        assert!(dom.children(a).is_empty());
        assert!(dom.children(b).is_empty());
    }

    #[test]
    fn test_create_element_invalid_tag() {
        let (mut dom, _) = page();
        let before = dom.tree().len();
        assert_eq!(
            dom.create_element("script", &Attributes::new(), Some("alert(1)")),
            Err(RenderError::InvalidTag("script".into()))
        );
        assert_eq!(dom.tree().len(), before);
    }

    #[test]
    fn test_replace_content_exact_order() {
        let (mut dom, c) = page();
        dom.append_content(c, ["old", "stale"]).unwrap();
        let a = dom.create_element("p", &Attributes::new(), Some("a")).unwrap();
        let b = dom.create_element("p", &Attributes::new(), Some("b")).unwrap();

        dom.replace_content(c, [a, b]).unwrap();
        assert_eq!(dom.children(c), vec![a, b]);
    }

    #[test]
    fn test_replace_content_mixed_strings() {
        let (mut dom, c) = page();
        let b = dom.create_element("b", &Attributes::new(), Some("bold")).unwrap();
        dom.replace_content(c, [Content::from("<i>x</i> "), Content::from(b)]).unwrap();
        assert_eq!(dom.inner_html(c), "&lt;i&gt;x&lt;/i&gt; <b>bold</b>");
    }

    #[test]
    fn test_replace_content_keeps_reinserted_child() {
        let (mut dom, c) = page();
        let keep = dom.create_element("p", &Attributes::new(), Some("keep")).unwrap();
        let drop = dom.create_element("p", &Attributes::new(), Some("drop")).unwrap();
        dom.append_content(c, [keep, drop]).unwrap();

        dom.replace_content(c, [keep]).unwrap();
        assert_eq!(dom.children(c), vec![keep]);
        assert_eq!(dom.text_content(c), "keep");
        assert!(!dom.tree().contains(drop));
    }

    #[test]
    fn test_replace_content_failure_leaves_old_content() {
        let (mut dom, c) = page();
        dom.append_content(c, ["old"]).unwrap();
        let body = dom.document().body();

        // body is an ancestor of the container: invalid insert
        let fresh = dom.create_element("p", &Attributes::new(), None).unwrap();
        let result = dom.replace_content(c, [fresh, body]);
        assert!(matches!(result, Err(RenderError::Dom(lsw_dom::DomError::HierarchyRequest { .. }))));
        assert_eq!(dom.text_content(c), "old");
        assert_eq!(dom.tree().parent(fresh), None);
    }

    #[test]
    fn test_replace_content_with_nothing_clears() {
        let (mut dom, c) = page();
        dom.append_content(c, ["a", "b"]).unwrap();
        dom.replace_content(c, Vec::<Content>::new()).unwrap();
        assert!(dom.children(c).is_empty());
    }

    #[test]
    fn test_append_content_preserves_existing() {
        let (mut dom, c) = page();
        dom.append_content(c, ["a"]).unwrap();
        let p = dom.create_element("p", &Attributes::new(), None).unwrap();
        dom.append_content(c, [Content::from(p), Content::from("b")]).unwrap();
        assert_eq!(dom.children(c).len(), 3);
        assert_eq!(dom.children(c)[1], p);
        assert_eq!(dom.text_content(c), "ab");
    }

    #[test]
    fn test_placeholders() {
        let (mut dom, c) = page();
        dom.append_content(c, ["stale"]).unwrap();

        let loading = dom.set_loading_state(c, None).unwrap();
        assert_eq!(dom.children(c), vec![loading]);
        assert_eq!(dom.outer_html(loading), "<div class=\"text-center text-gray-400\">Loading...</div>");

        let error = dom.set_error_state(c, Some("Error loading users.")).unwrap();
        assert_eq!(dom.children(c), vec![error]);
        assert!(dom.element(error).unwrap().classes.contains("text-red-400"));
        assert_eq!(dom.text_content(c), "Error loading users.");

        dom.set_empty_state(c, None).unwrap();
        assert_eq!(dom.text_content(c), "No data found");
        assert!(!dom.tree().contains(loading));
    }

    #[test]
    fn test_missing_container() {
        let (mut dom, c) = page();
        dom.remove(c).unwrap();
        assert!(matches!(
            dom.append_content(c, ["x"]),
            Err(RenderError::Dom(lsw_dom::DomError::NotFound(_)))
        ));
    }

    #[test]
    fn test_rejected_attribute_allocates_nothing() {
        let (mut dom, _) = page();
        let before = dom.tree().len();
        // hand-built entries are checked again when applied
        let attrs: Attributes = [
            crate::Attribute::ClassName("x".into()),
            crate::Attribute::Other { name: "a b".into(), value: "c".into() },
        ]
        .into_iter()
        .collect();
        assert_eq!(
            dom.create_element("div", &attrs, Some("text")),
            Err(RenderError::InvalidAttribute("a b".into()))
        );
        assert_eq!(dom.tree().len(), before);
    }

    #[test]
    fn test_failed_build_releases_detached_nodes() {
        let (mut dom, c) = page();
        dom.set_text(c, Some("keep")).unwrap();
        let before = dom.tree().len();

        let result: RenderResult<()> = dom.build(|dom| {
            let outer = dom.create_element("div", &Attributes::new(), Some("a"))?;
            let inner = dom.create_element("span", &Attributes::new(), Some("b"))?;
            dom.append_content(outer, [inner])?;
            dom.create_element("p", &Attributes::new(), None)?;
            dom.create_element("script", &Attributes::new(), None)?;
            Ok(())
        });
        assert_eq!(result, Err(RenderError::InvalidTag("script".into())));
        assert_eq!(dom.tree().len(), before);
        assert_eq!(dom.text_content(c), "keep");
    }

    #[test]
    fn test_nested_build_hands_nodes_to_outer_scope() {
        let (mut dom, _) = page();
        let before = dom.tree().len();

        let result: RenderResult<()> = dom.build(|dom| {
            dom.build(|dom| dom.create_element("p", &Attributes::new(), Some("x")))?;
            Err(RenderError::InvalidTag("late".into()))
        });
        assert!(result.is_err());
        assert_eq!(dom.tree().len(), before);
    }

    #[test]
    fn test_placeholder_on_stale_container_leaks_nothing() {
        let (mut dom, c) = page();
        dom.remove(c).unwrap();
        let before = dom.tree().len();
        assert!(dom.set_loading_state(c, None).is_err());
        assert_eq!(dom.tree().len(), before);
    }
}

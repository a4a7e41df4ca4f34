//! Core document types

use serde::{Deserialize, Serialize};

/// Raw input handed to a parser
///
/// Borrowed so callers can hash and parse the same buffer without copying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource<'a> {
    /// Location of the document; the parser is responsible for fetching it
    Url(&'a str),
    /// Raw document bytes
    Bytes(&'a [u8]),
    /// Document markup as text
    Text(&'a str),
}

impl DocumentSource<'_> {
    /// Short source kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
        }
    }
}

/// How cross-references inside a document are resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "base")]
pub enum ReferenceResolver {
    /// References are left unresolved
    #[default]
    None,
    /// References resolve relative to the given base (URL or directory)
    RelativeTo(String),
}

impl ReferenceResolver {
    /// Stable textual description of this resolver
    pub fn description(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::RelativeTo(base) => format!("relative-to:{}", base),
        }
    }
}

/// Settings snapshot passed to the parser
///
/// Only `font_size`, `ppi`, and `resolver` change parse output; they are the
/// fields that take part in cache fingerprinting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSettings {
    /// Default font size in user units
    pub font_size: f32,
    /// Pixels per inch used to convert absolute units
    pub ppi: f32,
    /// Cross-reference resolver
    pub resolver: ReferenceResolver,
    /// Caller-side label for diagnostics
    pub label: Option<String>,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            ppi: 96.0,
            resolver: ReferenceResolver::None,
            label: None,
        }
    }
}

impl ParseSettings {
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_ppi(mut self, ppi: f32) -> Self {
        self.ppi = ppi;
        self
    }

    pub fn with_resolver(mut self, resolver: ReferenceResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// SVG `viewBox`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Element attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element node of a parsed document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Element name (`svg`, `g`, `path`, ...)
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<Attribute>,
    /// Child elements in document order
    pub children: Vec<Node>,
    /// Character data (`text`, `tspan`, `style`)
    pub text: Option<String>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Look up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Element `id`, if any
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }
}

impl Drop for Node {
    // Flatten descendants onto a heap stack so dropping a deep tree does not
    // recurse once per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// A parsed SVG document
///
/// Immutable once produced by a parser. The cache hands it out as
/// `Arc<SvgDocument>`, so eviction never invalidates a caller's handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgDocument {
    /// Resolved width in pixels
    pub width: f32,
    /// Resolved height in pixels
    pub height: f32,
    /// Declared viewBox
    pub view_box: Option<ViewBox>,
    /// Root `<svg>` element
    pub root: Node,
}

impl SvgDocument {
    pub fn new(width: f32, height: f32, root: Node) -> Self {
        Self {
            width,
            height,
            view_box: None,
            root,
        }
    }

    pub fn with_view_box(mut self, view_box: ViewBox) -> Self {
        self.view_box = Some(view_box);
        self
    }

    /// Depth-first iterator over every element, root first
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Total number of elements in the tree
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Find the first element with the given `id`
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes().find(|n| n.id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SvgDocument {
        let root = Node::new("svg")
            .with_attribute("width", "100")
            .with_child(
                Node::new("g")
                    .with_attribute("id", "layer-1")
                    .with_child(Node::new("rect").with_attribute("id", "box")),
            )
            .with_child(Node::new("text").with_text("hello"));
        SvgDocument::new(100.0, 50.0, root)
    }

    #[test]
    fn test_node_count() {
        assert_eq!(sample().node_count(), 4);
    }

    #[test]
    fn test_nodes_depth_first_order() {
        let doc = sample();
        let tags: Vec<&str> = doc.nodes().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["svg", "g", "rect", "text"]);
    }

    #[test]
    fn test_find_by_id() {
        let doc = sample();
        assert_eq!(doc.find_by_id("box").map(|n| n.tag.as_str()), Some("rect"));
        assert!(doc.find_by_id("missing").is_none());
    }

    #[test]
    fn test_resolver_description() {
        assert_eq!(ReferenceResolver::None.description(), "none");
        assert_eq!(
            ReferenceResolver::RelativeTo("https://example.com/icons/".into()).description(),
            "relative-to:https://example.com/icons/"
        );
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ParseSettings::default();
        assert_eq!(settings.font_size, 12.0);
        assert_eq!(settings.ppi, 96.0);
        assert_eq!(settings.resolver, ReferenceResolver::None);
    }

    #[test]
    fn test_source_kind() {
        assert_eq!(DocumentSource::Url("a.svg").kind(), "url");
        assert_eq!(DocumentSource::Bytes(b"<svg/>").kind(), "bytes");
        assert_eq!(DocumentSource::Text("<svg/>").kind(), "text");
    }

    #[test]
    fn test_deep_document_drops_without_recursion() {
        let mut root = Node::new("g");
        for _ in 0..200_000 {
            root = Node::new("g").with_child(root);
        }
        let doc = std::sync::Arc::new(SvgDocument::new(1.0, 1.0, root));
        let last = std::sync::Arc::clone(&doc);
        drop(doc);
        assert_eq!(last.node_count(), 200_001);
        drop(last);
    }
}

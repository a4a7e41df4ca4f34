//! Document traits
//!
//! Collaborator interfaces around the cache: parsers produce documents,
//! size estimators feed the cache's byte budget.

use std::mem::size_of;

use super::types::{Attribute, DocumentSource, Node, ParseSettings, SvgDocument};

/// Parser collaborator
///
/// Implemented by callers. The cache never calls a parser while holding its
/// lock and never stores a failed parse.
pub trait DocumentParser<D> {
    type Error;

    /// Parse `source` under `settings`
    fn parse(&self, source: &DocumentSource<'_>, settings: &ParseSettings)
        -> Result<D, Self::Error>;
}

/// Approximate in-memory footprint of a cached value
pub trait EstimateSize {
    /// Estimated size in bytes
    fn estimated_size(&self) -> u64;
}

impl EstimateSize for Node {
    fn estimated_size(&self) -> u64 {
        // Iterative so deeply nested documents can't blow the stack.
        let mut total = 0usize;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += size_of::<Node>() + node.tag.len();
            total += node.text.as_ref().map_or(0, String::len);
            total += node
                .attributes
                .iter()
                .map(|a| size_of::<Attribute>() + a.name.len() + a.value.len())
                .sum::<usize>();
            stack.extend(node.children.iter());
        }
        total as u64
    }
}

impl EstimateSize for SvgDocument {
    fn estimated_size(&self) -> u64 {
        (size_of::<SvgDocument>() - size_of::<Node>()) as u64 + self.root.estimated_size()
    }
}

impl EstimateSize for String {
    fn estimated_size(&self) -> u64 {
        (size_of::<String>() + self.len()) as u64
    }
}

impl EstimateSize for Vec<u8> {
    fn estimated_size(&self) -> u64 {
        (size_of::<Vec<u8>>() + self.len()) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_grows_with_nodes() {
        let small = SvgDocument::new(10.0, 10.0, Node::new("svg"));
        let large = SvgDocument::new(
            10.0,
            10.0,
            Node::new("svg")
                .with_child(Node::new("path").with_attribute("d", "M0 0 L10 10 Z"))
                .with_child(Node::new("circle").with_attribute("r", "4")),
        );
        assert!(large.estimated_size() > small.estimated_size());
    }

    #[test]
    fn test_size_counts_attribute_bytes() {
        let short = Node::new("path").with_attribute("d", "M0 0");
        let long = Node::new("path").with_attribute("d", "M0 0 ".repeat(100));
        assert_eq!(
            long.estimated_size() - short.estimated_size(),
            ("M0 0 ".len() * 100 - "M0 0".len()) as u64
        );
    }

    #[test]
    fn test_single_node_size() {
        let node = Node::new("g").with_text("ab");
        assert_eq!(node.estimated_size(), (size_of::<Node>() + 1 + 2) as u64);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut node = Node::new("g");
        for _ in 0..100_000 {
            node = Node::new("g").with_child(node);
        }
        let size = node.estimated_size();
        assert!(size >= 100_001 * size_of::<Node>() as u64);
        drop(node);
    }
}

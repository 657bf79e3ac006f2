//! Mock content tree implementation for testing.
//!
//! Provides [`MockContentTree`] for unit testing without an export file.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::node::{ContentNode, Image};
use crate::tree::{ContentError, ContentErrorKind, ContentRef, ContentTree};

const BACKEND: &str = "Mock";

/// Mock content tree for testing.
///
/// Stores nodes and images in memory. Use the builder methods to configure
/// the mock with test data. Children are returned in insertion order.
///
/// # Example
///
/// ```ignore
/// use smap_content::{ContentNode, ContentTree, MockContentTree};
///
/// let tree = MockContentTree::new()
///     .with_root(ContentNode::page(1, "/"))
///     .with_child(1, ContentNode::page(2, "/about"));
///
/// assert_eq!(tree.children(1).unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockContentTree {
    nodes: RwLock<HashMap<u64, ContentNode>>,
    children: RwLock<HashMap<u64, Vec<u64>>>,
    images: RwLock<HashMap<u64, Image>>,
    failing: RwLock<HashSet<u64>>,
    calls: RwLock<Vec<u64>>,
}

impl MockContentTree {
    /// Create a new empty mock tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node without a parent.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_root(self, node: ContentNode) -> Self {
        self.nodes.write().unwrap().insert(node.id, node);
        self
    }

    /// Add `node` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_child(self, parent: u64, node: ContentNode) -> Self {
        self.children
            .write()
            .unwrap()
            .entry(parent)
            .or_default()
            .push(node.id);
        self.nodes.write().unwrap().insert(node.id, node);
        self
    }

    /// Add an image asset.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_image(self, image: Image) -> Self {
        self.images.write().unwrap().insert(image.id, image);
        self
    }

    /// Make `children(id)` fail with an unavailable error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_children(self, id: u64) -> Self {
        self.failing.write().unwrap().insert(id);
        self
    }

    /// Node ids passed to `children()` so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn children_calls(&self) -> Vec<u64> {
        self.calls.read().unwrap().clone()
    }
}

impl ContentTree for MockContentTree {
    fn node(&self, id: u64) -> Result<ContentNode, ContentError> {
        self.nodes
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ContentError::node_not_found(id).with_backend(BACKEND))
    }

    fn children(&self, id: u64) -> Result<Vec<ContentNode>, ContentError> {
        self.calls.write().unwrap().push(id);

        if self.failing.read().unwrap().contains(&id) {
            return Err(ContentError::new(ContentErrorKind::Unavailable)
                .with_backend(BACKEND)
                .with_subject(ContentRef::Node(id)));
        }

        let nodes = self.nodes.read().unwrap();
        if !nodes.contains_key(&id) {
            return Err(ContentError::node_not_found(id).with_backend(BACKEND));
        }
        Ok(self
            .children
            .read()
            .unwrap()
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child| nodes.get(child).cloned())
            .collect())
    }

    fn image(&self, id: u64) -> Result<Image, ContentError> {
        self.images
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ContentError::image_not_found(id).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_tree_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockContentTree>();
    }

    #[test]
    fn test_children_in_insertion_order() {
        let tree = MockContentTree::new()
            .with_root(ContentNode::page(1, "/"))
            .with_child(1, ContentNode::page(3, "/b"))
            .with_child(1, ContentNode::page(2, "/a"));

        let children: Vec<u64> = tree.children(1).unwrap().iter().map(|n| n.id).collect();
        assert_eq!(children, vec![3, 2]);
        assert_eq!(tree.children_calls(), vec![1]);
    }

    #[test]
    fn test_missing_lookups() {
        let tree = MockContentTree::new();

        assert!(tree.node(1).unwrap_err().is_not_found());
        assert!(tree.children(1).unwrap_err().is_not_found());
        assert!(tree.image(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_failing_children() {
        let tree = MockContentTree::new()
            .with_root(ContentNode::page(1, "/"))
            .with_failing_children(1);

        let err = tree.children(1).unwrap_err();
        assert_eq!(err.kind, ContentErrorKind::Unavailable);
        assert_eq!(err.to_string(), "[Mock] Unavailable (node 1)");
    }
}

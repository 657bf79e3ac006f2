//! File-backed content tree.
//!
//! [`FileContentTree`] loads a full export of the content tree from a JSON or
//! YAML file into memory. Nodes list their parent by id; sibling order is the
//! order in which nodes appear in the file.
//!
//! ```yaml
//! nodes:
//!   - id: 1
//!     kind: page
//!     path: /
//!     modified: 1705314600
//!     language: en
//!   - id: 2
//!     parent: 1
//!     kind: page
//!     path: /about
//!     elements:
//!       - kind: image
//!         image_id: 10
//!         alt: Our team
//! images:
//!   - id: 10
//!     thumbnail: /img/team.jpg
//!     metadata:
//!       en: { title: Team photo, alt: Everyone at the office }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::node::{ContentNode, Image, NodeKind, PageElement};
use crate::tree::{ContentError, ContentErrorKind, ContentRef, ContentTree};

const BACKEND: &str = "File";

/// Top-level layout of an export file.
#[derive(Deserialize)]
struct TreeExport {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    images: Vec<Image>,
}

/// One node as written in an export file.
#[derive(Deserialize)]
struct NodeRecord {
    id: u64,
    #[serde(default)]
    parent: Option<u64>,
    #[serde(default)]
    kind: NodeKind,
    path: String,
    #[serde(default)]
    modified: i64,
    #[serde(default)]
    sitemap_exclude: bool,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    elements: Vec<PageElement>,
}

/// In-memory content tree loaded from an export file.
#[derive(Debug, Default)]
pub struct FileContentTree {
    nodes: HashMap<u64, ContentNode>,
    children: HashMap<u64, Vec<u64>>,
    images: HashMap<u64, Image>,
}

impl FileContentTree {
    /// Load an export file, choosing the format by extension
    /// (`.json`, `.yaml`, `.yml`).
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the file cannot be read, has an unsupported
    /// extension, or does not describe a consistent tree.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ContentError::io(e, path).with_backend(BACKEND))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let result = match extension.as_deref() {
            Some("json") => Self::from_json(&content),
            Some("yaml" | "yml") => Self::from_yaml(&content),
            _ => Err(invalid("unsupported tree file extension (expected .json, .yaml or .yml)")),
        };

        let tree = result.map_err(|e| match e.subject {
            Some(_) => e,
            None => e.with_subject(ContentRef::File(path.to_path_buf())),
        })?;
        tracing::debug!(
            path = %path.display(),
            nodes = tree.nodes.len(),
            images = tree.images.len(),
            "Loaded content tree"
        );
        Ok(tree)
    }

    /// Parse a JSON export.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::InvalidData`] on malformed JSON or an
    /// inconsistent tree.
    pub fn from_json(content: &str) -> Result<Self, ContentError> {
        let export: TreeExport =
            serde_json::from_str(content).map_err(|e| invalid("invalid JSON").with_source(e))?;
        Self::from_export(export)
    }

    /// Parse a YAML export.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::InvalidData`] on malformed YAML or an
    /// inconsistent tree.
    pub fn from_yaml(content: &str) -> Result<Self, ContentError> {
        let export: TreeExport =
            serde_yaml::from_str(content).map_err(|e| invalid("invalid YAML").with_source(e))?;
        Self::from_export(export)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn from_export(export: TreeExport) -> Result<Self, ContentError> {
        let mut tree = Self::default();
        let mut parents = Vec::with_capacity(export.nodes.len());

        for record in export.nodes {
            if tree.nodes.contains_key(&record.id) {
                return Err(invalid("duplicate node id").with_subject(ContentRef::Node(record.id)));
            }
            if record.parent == Some(record.id) {
                return Err(invalid("node is its own parent").with_subject(ContentRef::Node(record.id)));
            }
            if let Some(parent) = record.parent {
                parents.push((parent, record.id));
            }
            tree.nodes.insert(
                record.id,
                ContentNode {
                    id: record.id,
                    kind: record.kind,
                    full_path: record.path,
                    modified: record.modified,
                    sitemap_exclude: record.sitemap_exclude,
                    language: record.language,
                    elements: record.elements,
                },
            );
        }

        // Parents may appear after their children in the file, so link once
        // all nodes are known. Sibling order still follows file order.
        for (parent, child) in parents {
            if !tree.nodes.contains_key(&parent) {
                return Err(invalid(format!("unknown parent {parent}"))
                    .with_subject(ContentRef::Node(child)));
            }
            tree.children.entry(parent).or_default().push(child);
        }

        for image in export.images {
            let id = image.id;
            if tree.images.insert(id, image).is_some() {
                return Err(invalid("duplicate image id").with_subject(ContentRef::Image(id)));
            }
        }

        Ok(tree)
    }
}

impl ContentTree for FileContentTree {
    fn node(&self, id: u64) -> Result<ContentNode, ContentError> {
        self.nodes
            .get(&id)
            .cloned()
            .ok_or_else(|| ContentError::node_not_found(id).with_backend(BACKEND))
    }

    fn children(&self, id: u64) -> Result<Vec<ContentNode>, ContentError> {
        if !self.nodes.contains_key(&id) {
            return Err(ContentError::node_not_found(id).with_backend(BACKEND));
        }
        Ok(self
            .children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.nodes.get(child).cloned())
            .collect())
    }

    fn image(&self, id: u64) -> Result<Image, ContentError> {
        self.images
            .get(&id)
            .cloned()
            .ok_or_else(|| ContentError::image_not_found(id).with_backend(BACKEND))
    }
}

fn invalid(message: impl Into<String>) -> ContentError {
    ContentError::new(ContentErrorKind::InvalidData)
        .with_backend(BACKEND)
        .with_message(message)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::node::ElementKind;

    const YAML_EXPORT: &str = r"
nodes:
  - id: 1
    kind: page
    path: /
    modified: 1705314600
    language: en
  - id: 3
    parent: 1
    kind: folder
    path: /blog
  - id: 2
    parent: 1
    kind: page
    path: /about
    sitemap_exclude: true
    elements:
      - kind: image
        image_id: 10
        alt: Our team
      - kind: wysiwyg
  - id: 4
    parent: 3
    path: /blog/post-1
images:
  - id: 10
    thumbnail: /img/team.jpg
    metadata:
      en: { title: Team photo, alt: Everyone at the office }
";

    fn ids(nodes: &[ContentNode]) -> Vec<u64> {
        nodes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_from_yaml_preserves_file_order() {
        let tree = FileContentTree::from_yaml(YAML_EXPORT).unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(ids(&tree.children(1).unwrap()), vec![3, 2]);
        assert_eq!(ids(&tree.children(3).unwrap()), vec![4]);
        assert!(tree.children(4).unwrap().is_empty());
    }

    #[test]
    fn test_from_yaml_node_fields() {
        let tree = FileContentTree::from_yaml(YAML_EXPORT).unwrap();

        let about = tree.node(2).unwrap();
        assert_eq!(about.full_path, "/about");
        assert!(about.sitemap_exclude);
        assert_eq!(about.elements.len(), 2);
        assert_eq!(about.elements[0].kind, ElementKind::Image);
        assert_eq!(about.elements[0].image_id, Some(10));
        assert_eq!(about.elements[1].kind, ElementKind::Other);

        let post = tree.node(4).unwrap();
        assert_eq!(post.kind, NodeKind::Page);
        assert_eq!(post.modified, 0);

        let image = tree.image(10).unwrap();
        assert_eq!(image.thumbnail, "/img/team.jpg");
        assert_eq!(image.title(Some("en")), Some("Team photo"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "nodes": [
                {"id": 1, "kind": "page", "path": "/"},
                {"id": 2, "parent": 1, "kind": "snippet", "path": "/footer"}
            ]
        }"#;
        let tree = FileContentTree::from_json(json).unwrap();

        let children = tree.children(1).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind, NodeKind::Snippet);
    }

    #[test]
    fn test_lookup_missing() {
        let tree = FileContentTree::from_yaml(YAML_EXPORT).unwrap();

        assert!(tree.node(99).unwrap_err().is_not_found());
        assert!(tree.children(99).unwrap_err().is_not_found());
        assert!(tree.image(99).unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_node_id_rejected() {
        let json = r#"{"nodes": [{"id": 1, "path": "/"}, {"id": 1, "path": "/x"}]}"#;
        let err = FileContentTree::from_json(json).unwrap_err();

        assert_eq!(err.kind, ContentErrorKind::InvalidData);
        assert_eq!(err.subject, Some(ContentRef::Node(1)));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let json = r#"{"nodes": [{"id": 2, "parent": 1, "path": "/x"}]}"#;
        let err = FileContentTree::from_json(json).unwrap_err();

        assert_eq!(err.kind, ContentErrorKind::InvalidData);
        assert!(err.to_string().contains("unknown parent 1"));
    }

    #[test]
    fn test_self_parent_rejected() {
        let json = r#"{"nodes": [{"id": 2, "parent": 2, "path": "/x"}]}"#;
        let err = FileContentTree::from_json(json).unwrap_err();

        assert_eq!(err.kind, ContentErrorKind::InvalidData);
    }

    #[test]
    fn test_malformed_json() {
        let err = FileContentTree::from_json("{not json").unwrap_err();
        assert_eq!(err.kind, ContentErrorKind::InvalidData);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.yml");
        std::fs::write(&path, YAML_EXPORT).unwrap();

        let tree = FileContentTree::load(&path).unwrap();
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.xml");
        std::fs::write(&path, "<tree/>").unwrap();

        let err = FileContentTree::load(&path).unwrap_err();
        assert_eq!(err.kind, ContentErrorKind::InvalidData);
        assert_eq!(err.subject, Some(ContentRef::File(path)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FileContentTree::load(Path::new("/nonexistent/tree.json")).unwrap_err();
        assert!(err.is_not_found());
    }
}

//! Content tree gateway for smap.
//!
//! This crate provides a [`ContentTree`] trait for read-only access to the
//! hierarchical content tree a set of websites is built from. The sitemap
//! generator only ever asks three questions of it: "what is node N", "what
//! are the children of node N, in order", and "what is image I".
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentTree`] trait with `node()`, `children()`, and `image()` methods
//! - [`FileContentTree`] backed by a JSON or YAML export of the tree
//! - [`MockContentTree`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use smap_content::{ContentTree, FileContentTree};
//!
//! let tree = FileContentTree::load("content.json".as_ref())?;
//! for child in tree.children(1)? {
//!     println!("{} {}", child.id, child.full_path);
//! }
//! ```

mod file;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod node;
mod tree;

pub use file::FileContentTree;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockContentTree;
pub use node::{ContentNode, ElementKind, Image, ImageMetadata, NodeKind, PageElement};
pub use tree::{ContentError, ContentErrorKind, ContentRef, ContentTree};

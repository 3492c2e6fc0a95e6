//! Published content boundary
//!
//! The content tree is owned by the content-management framework. This crate
//! only reads it, through two narrow traits:
//! - [`ContentNode`]: one published item (kind, fields, parent/children, URL)
//! - [`ContentSource`]: hands out the current published snapshot
//!
//! [`JsonFileContentSource`] adapts a JSON export of the published tree.

mod snapshot;
mod source;

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;

pub use snapshot::{ContentSnapshot, NodeRef, RawNode, slugify};
pub use source::{JsonFileContentSource, StaticContentSource};

/// Content type alias of a policy card
pub const POLICY_KIND: &str = "policyCard";
/// Content type alias of a handbook category card
pub const CATEGORY_KIND: &str = "HandbookCategoryCard";

/// Field aliases read from published items
pub mod fields {
    pub const POLICY_TITLE: &str = "policyTitle";
    pub const SUMMARY: &str = "summary";
    pub const FULL_POLICY_TEXT: &str = "fullPolicyText";
    pub const REVISION_DATE: &str = "revisionDate";
    pub const CATEGORY_TITLE: &str = "categoryTitle";
    pub const CATEGORY_DESCRIPTION: &str = "categoryDescription";
}

/// Read-only view of one published content item
pub trait ContentNode: Sized + Clone {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
    /// Content type alias
    fn kind(&self) -> &str;
    fn field(&self, alias: &str) -> Option<String>;
    fn children(&self) -> Vec<Self>;
    fn parent(&self) -> Option<Self>;
    fn url(&self) -> String;

    /// Depth-first pre-order walk, starting with `self`
    fn descendants_or_self(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            let children = node.children();
            out.push(node);
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

/// Supplier of the published content tree
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// `Ok(None)` when the published content cache is not available
    async fn published(&self) -> Result<Option<Arc<ContentSnapshot>>>;
}

/// Every node under every root, roots included, in document order
pub fn flatten<N: ContentNode>(roots: &[N]) -> Vec<N> {
    roots.iter().flat_map(|r| r.descendants_or_self()).collect()
}

//! Page service capabilities consumed by the tree engine.
//!
//! The engine needs exactly three calls: children of a parent, a single node
//! (for its parent link), and persisting a sibling order. Each may fail on its
//! own; `Ok(None)` from a fetch means the node is inaccessible and there is
//! nothing to cache.

pub mod http;
#[cfg(test)]
pub(crate) mod scripted;

use crate::error::ApiError;
use crate::reorder::OrderScope;
use crate::tree::node::{ChildSummary, NodeDetail};
use crate::types::NodeId;
use async_trait::async_trait;

pub use http::HttpTreeSource;

#[async_trait]
pub trait TreeSource: Send + Sync {
    /// Ordered children of `parent`.
    async fn fetch_children(&self, parent: &NodeId) -> Result<Option<Vec<ChildSummary>>, ApiError>;

    /// Detail of `id`, including its parent link.
    async fn fetch_node(&self, id: &NodeId) -> Result<Option<NodeDetail>, ApiError>;

    /// Store `ordered` as the sibling order of `scope`. Re-sending the same
    /// order must leave the service unchanged.
    async fn persist_order(&self, scope: &OrderScope, ordered: &[NodeId]) -> Result<(), ApiError>;
}

//! Navigation tree state: node descriptors, the children cache, and expansion.

pub mod cache;
pub mod expansion;
pub mod node;

pub use cache::NodeCache;
pub use expansion::{ExpansionState, Flip};
pub use node::{
    AccessLevel, ApprovalStatus, ChildSummary, EmbeddedChild, Node, NodeDetail, NoteType, WorkArea,
};

use crate::types::NodeId;
use std::collections::HashMap;

/// Mutable tree state of one sidebar session.
#[derive(Debug, Default)]
pub struct TreeState {
    pub cache: NodeCache,
    pub expansion: ExpansionState,
    /// Last fetch failure per parent, cleared by the next successful fetch.
    pub fetch_errors: HashMap<NodeId, String>,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }
}

//! Expansion state: which nodes currently render their children.

use crate::types::NodeId;
use std::collections::HashSet;

/// Result of flipping one node's expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    Expanded,
    Collapsed,
}

#[derive(Debug, Default, Clone)]
pub struct ExpansionState {
    open: HashSet<NodeId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.open.contains(id)
    }

    /// Collapse if open, otherwise expand. Fetching is the caller's job.
    pub fn flip(&mut self, id: &NodeId) -> Flip {
        if self.open.remove(id) {
            Flip::Collapsed
        } else {
            self.open.insert(id.clone());
            Flip::Expanded
        }
    }

    pub fn expand(&mut self, id: NodeId) -> bool {
        self.open.insert(id)
    }

    pub fn collapse(&mut self, id: &NodeId) -> bool {
        self.open.remove(id)
    }

    /// Expand every id in `ids` except `skip`; returns how many were newly opened.
    pub fn expand_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>, skip: &NodeId) -> usize {
        ids.into_iter()
            .filter(|id| *id != skip)
            .filter(|id| self.open.insert((*id).clone()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.open.iter()
    }
}

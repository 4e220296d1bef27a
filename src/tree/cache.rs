//! Node Cache
//!
//! Per-parent memoized children. Entries are replaced wholesale on every
//! population; a lookup never triggers a fetch.

use crate::tree::node::{ChildSummary, Node};
use crate::types::NodeId;
use std::collections::HashMap;
use tracing::debug;

/// Children lists keyed by parent id, held for the life of a sidebar session.
#[derive(Debug, Default, Clone)]
pub struct NodeCache {
    entries: HashMap<NodeId, Vec<ChildSummary>>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parent: &NodeId) -> Option<&[ChildSummary]> {
        self.entries.get(parent).map(Vec::as_slice)
    }

    pub fn has(&self, parent: &NodeId) -> bool {
        self.entries.contains_key(parent)
    }

    /// Replace the entry for `parent`. Last write wins.
    pub fn set(&mut self, parent: NodeId, children: Vec<ChildSummary>) {
        debug!(parent = %parent, count = children.len(), "Cache entry replaced");
        self.entries.insert(parent, children);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over every (parent, children) entry.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &[ChildSummary])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// First cached parent whose children contain `child`.
    ///
    /// A node has one parent, so at most one entry should match; if corrupted
    /// data lists it twice the lexicographically smallest parent is returned
    /// so the walk stays deterministic.
    pub fn parent_of(&self, child: &NodeId) -> Option<&NodeId> {
        self.entries
            .iter()
            .filter(|(_, children)| children.iter().any(|c| &c.id == child))
            .map(|(parent, _)| parent)
            .min()
    }

    /// Pre-cache embedded children of root nodes that have no entry yet.
    ///
    /// Returns the parents that were seeded.
    pub fn seed_from_roots<'a>(&mut self, roots: impl IntoIterator<Item = &'a Node>) -> Vec<NodeId> {
        let mut seeded = Vec::new();
        for node in roots {
            if self.has(&node.id) {
                continue;
            }
            let children = node.embedded_summaries();
            if children.is_empty() {
                continue;
            }
            self.entries.insert(node.id.clone(), children);
            seeded.push(node.id.clone());
        }
        if !seeded.is_empty() {
            debug!(count = seeded.len(), "Seeded cache from embedded children");
        }
        seeded
    }

    /// Insert or update one child under `parent`, creating the entry if needed.
    pub fn add_child(&mut self, parent: &NodeId, child: ChildSummary) {
        let children = self.entries.entry(parent.clone()).or_default();
        match children.iter_mut().find(|c| c.id == child.id) {
            Some(existing) => *existing = child,
            None => children.push(child),
        }
    }

    /// Patch title and icon of `node` in every entry that lists it.
    ///
    /// Returns the number of entries touched.
    pub fn update_node(&mut self, node: &NodeId, title: &str, icon: &str) -> usize {
        let mut touched = 0;
        for children in self.entries.values_mut() {
            if let Some(existing) = children.iter_mut().find(|c| &c.id == node) {
                existing.title = title.to_string();
                existing.icon = icon.to_string();
                touched += 1;
            }
        }
        touched
    }

    /// Drop `node` from every entry along with its own children entry.
    pub fn remove_node(&mut self, node: &NodeId) {
        for children in self.entries.values_mut() {
            children.retain(|c| &c.id != node);
        }
        self.entries.remove(node);
    }
}

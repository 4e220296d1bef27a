//! Ancestor path resolution
//!
//! Reconstructs the chain of parents from a selected node up to a root over a
//! partially loaded tree. Each hop tries, in order: the children cache, the
//! parent link of a node already in the collection, the embedded children of
//! root pages, and finally a by-id lookup against the page service. A node
//! fetched by id also brings its children, which are cached unless an entry
//! already exists. The walk is an explicit loop bounded by `max_depth` and
//! stops on a repeated id.
//!
//! Resolution is best effort. Whatever chain was found is returned; nothing
//! here produces an error.

use crate::source::TreeSource;
use crate::tree::node::Node;
use crate::tree::TreeState;
use crate::types::NodeId;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// Reached a root page.
    Root,
    /// No further parent could be determined.
    Exhausted,
    /// Hit `max_depth` hops.
    DepthLimit,
    /// An id repeated; the data holds a cycle.
    Cycle,
}

/// Result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorPath {
    pub target: NodeId,
    /// Nearest parent first.
    pub ancestors: Vec<NodeId>,
    pub end: WalkEnd,
}

impl AncestorPath {
    /// Target followed by its ancestors.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        std::iter::once(&self.target).chain(self.ancestors.iter())
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.ids().any(|candidate| candidate == id)
    }

    pub fn into_set(self) -> HashSet<NodeId> {
        std::iter::once(self.target).chain(self.ancestors).collect()
    }
}

enum Hop {
    Parent(NodeId),
    /// The parent is a root page; stop after adding it.
    Root(NodeId),
    None,
}

/// Walks parent links using the cache, the known collection, and the source.
pub struct PathResolver<'a> {
    source: &'a dyn TreeSource,
    max_depth: usize,
}

impl<'a> PathResolver<'a> {
    pub fn new(source: &'a dyn TreeSource, max_depth: usize) -> Self {
        Self { source, max_depth }
    }

    pub async fn resolve(&self, target: &NodeId, state: &RwLock<TreeState>, nodes: &[Node]) -> AncestorPath {
        let mut seen: HashSet<NodeId> = HashSet::from([target.clone()]);
        let mut ancestors = Vec::new();
        let mut current = target.clone();

        let end = loop {
            if ancestors.len() >= self.max_depth {
                warn!(target = %target, depth = self.max_depth, "Ancestor walk hit depth limit");
                break WalkEnd::DepthLimit;
            }
            let (next, terminal) = match self.next_hop(&current, state, nodes).await {
                Hop::Parent(parent) => (parent, false),
                Hop::Root(root) => (root, true),
                Hop::None => {
                    let is_root = nodes.iter().any(|n| n.id == current && n.is_root());
                    break if is_root { WalkEnd::Root } else { WalkEnd::Exhausted };
                }
            };
            if !seen.insert(next.clone()) {
                warn!(target = %target, node_id = %next, "Cycle in parent links, stopping walk");
                break WalkEnd::Cycle;
            }
            ancestors.push(next.clone());
            if terminal {
                break WalkEnd::Root;
            }
            current = next;
        };

        debug!(target = %target, depth = ancestors.len(), end = ?end, "Resolved ancestor path");
        AncestorPath {
            target: target.clone(),
            ancestors,
            end,
        }
    }

    async fn next_hop(&self, id: &NodeId, state: &RwLock<TreeState>, nodes: &[Node]) -> Hop {
        let cached = state.read().cache.parent_of(id).cloned();
        if let Some(parent) = cached {
            return Hop::Parent(parent);
        }

        if let Some(known) = nodes.iter().find(|n| &n.id == id) {
            return match &known.parent_id {
                Some(parent) => Hop::Parent(parent.clone()),
                None => Hop::None,
            };
        }

        if let Some(root) = nodes.iter().find(|n| n.is_root() && n.embeds_child(id)) {
            return Hop::Root(root.id.clone());
        }

        if !id.is_fetchable() {
            return Hop::None;
        }

        match self.source.fetch_node(id).await {
            Ok(Some(detail)) => {
                {
                    let mut state = state.write();
                    if !state.cache.has(id) {
                        state.cache.set(id.clone(), detail.child_summaries());
                    }
                }
                match detail.parent_id {
                    Some(parent) if parent.is_fetchable() => Hop::Parent(parent),
                    _ => Hop::None,
                }
            }
            Ok(None) => {
                debug!(node_id = %id, "Node inaccessible, ancestor walk ends here");
                Hop::None
            }
            Err(e) => {
                warn!(node_id = %id, error = %e, "Ancestor lookup failed");
                Hop::None
            }
        }
    }
}

/// Per-target markers that suppress repeated resolution inside a cooldown.
#[derive(Debug)]
pub struct RecentResolutions {
    cooldown: Duration,
    resolved_at: HashMap<NodeId, Instant>,
}

impl RecentResolutions {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            resolved_at: HashMap::new(),
        }
    }

    pub fn is_recent(&self, target: &NodeId, now: Instant) -> bool {
        self.resolved_at
            .get(target)
            .is_some_and(|at| now.saturating_duration_since(*at) < self.cooldown)
    }

    /// Skip only when the target was resolved recently and its content is
    /// known to be loaded.
    pub fn should_skip(&self, target: &NodeId, content_loaded: bool, now: Instant) -> bool {
        content_loaded && self.is_recent(target, now)
    }

    pub fn record(&mut self, target: NodeId, now: Instant) {
        let cooldown = self.cooldown;
        self.resolved_at
            .retain(|_, at| now.saturating_duration_since(*at) < cooldown);
        self.resolved_at.insert(target, now);
    }

    pub fn len(&self) -> usize {
        self.resolved_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved_at.is_empty()
    }
}

//! In-memory page service for end-to-end session tests.

use async_trait::async_trait;
use canopy::error::ApiError;
use canopy::reorder::OrderScope;
use canopy::source::TreeSource;
use canopy::tree::{ChildSummary, EmbeddedChild, NodeDetail};
use canopy::types::NodeId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A fixed page tree. Children come back in insertion order.
#[derive(Default)]
pub struct PageTree {
    parents: HashMap<NodeId, Option<NodeId>>,
    children: HashMap<NodeId, Vec<NodeId>>,
    pub child_fetches: AtomicUsize,
    pub node_fetches: AtomicUsize,
    pub persisted: Mutex<Vec<(OrderScope, Vec<NodeId>)>>,
}

impl PageTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, id: &str, parent: Option<&str>) -> Self {
        let id = NodeId::new(id);
        let parent = parent.map(NodeId::new);
        if let Some(parent) = &parent {
            self.children.entry(parent.clone()).or_default().push(id.clone());
        }
        self.children.entry(id.clone()).or_default();
        self.parents.insert(id, parent);
        self
    }

    fn detail(&self, id: &NodeId) -> Option<NodeDetail> {
        let parent = self.parents.get(id)?;
        let children = self
            .children
            .get(id)
            .map(|ids| {
                ids.iter()
                    .map(|child| EmbeddedChild {
                        id: Some(child.clone()),
                        title: Some(format!("Page {}", child)),
                        icon: None,
                        owner_email: None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Some(NodeDetail {
            id: id.clone(),
            parent_id: parent.clone(),
            title: format!("Page {}", id),
            children,
        })
    }

    pub fn child_fetch_count(&self) -> usize {
        self.child_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TreeSource for PageTree {
    async fn fetch_children(&self, parent: &NodeId) -> Result<Option<Vec<ChildSummary>>, ApiError> {
        self.child_fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.detail(parent).map(|d| d.child_summaries()))
    }

    async fn fetch_node(&self, id: &NodeId) -> Result<Option<NodeDetail>, ApiError> {
        self.node_fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.detail(id))
    }

    async fn persist_order(&self, scope: &OrderScope, ordered: &[NodeId]) -> Result<(), ApiError> {
        self.persisted.lock().push((scope.clone(), ordered.to_vec()));
        Ok(())
    }
}

pub fn ids(raw: &[&str]) -> Vec<NodeId> {
    raw.iter().map(|s| NodeId::new(*s)).collect()
}

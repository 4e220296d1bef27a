//! Offline Snapshot Store
//!
//! Local fallback copy of what the sidebar last showed: the root page list in
//! display order, per-parent children and sibling orders, and content-loaded
//! markers. Read on cold start when no live collection is available.

pub mod persistence;

use crate::error::StorageError;
use crate::reorder::OrderScope;
use crate::tree::node::{ChildSummary, Node};
use crate::types::NodeId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub use persistence::{MemorySnapshotStore, SledSnapshotStore};

pub const ROOT_NODES_KEY: &str = "rootNodes";
pub const ROOT_ORDER_KEY: &str = "rootOrder";

fn node_order_key(parent: &NodeId) -> String {
    format!("nodeOrder-{}", parent)
}

fn children_key(parent: &NodeId) -> String {
    format!("children-{}", parent)
}

fn content_loaded_key(id: &NodeId) -> String {
    format!("content-loaded-{}", id)
}

/// Raw key/value backend for snapshots.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Root order record, stamped with the write time in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootOrder {
    pub ids: Vec<NodeId>,
    pub time: i64,
}

/// Put `ordered` first, then every remaining item in its previous order.
fn apply_order<T>(items: Vec<T>, ordered: &[NodeId], id_of: impl Fn(&T) -> &NodeId) -> Vec<T> {
    let mut by_id: HashMap<NodeId, T> = HashMap::with_capacity(items.len());
    let mut original: Vec<NodeId> = Vec::with_capacity(items.len());
    for item in items {
        let id = id_of(&item).clone();
        original.push(id.clone());
        by_id.insert(id, item);
    }
    let mut result = Vec::with_capacity(original.len());
    for id in ordered {
        if let Some(item) = by_id.remove(id) {
            result.push(item);
        }
    }
    for id in original {
        if let Some(item) = by_id.remove(&id) {
            result.push(item);
        }
    }
    result
}

/// Typed view over a [`SnapshotStore`].
#[derive(Clone)]
pub struct OfflineSnapshot {
    store: Arc<dyn SnapshotStore>,
}

impl OfflineSnapshot {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Snapshot kept only in memory; used when no on-disk store is configured.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySnapshotStore::new()))
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get(key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| StorageError::Codec {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value).map_err(|source| StorageError::Codec {
            key: key.to_string(),
            source,
        })?;
        self.store.put(key, &bytes)
    }

    pub fn load_root_nodes(&self) -> Result<Option<Vec<Node>>, StorageError> {
        self.read(ROOT_NODES_KEY)
    }

    pub fn save_root_nodes(&self, nodes: &[Node]) -> Result<(), StorageError> {
        self.write(ROOT_NODES_KEY, nodes)
    }

    pub fn load_children(&self, parent: &NodeId) -> Result<Option<Vec<ChildSummary>>, StorageError> {
        self.read(&children_key(parent))
    }

    pub fn save_children(&self, parent: &NodeId, children: &[ChildSummary]) -> Result<(), StorageError> {
        self.write(&children_key(parent), children)
    }

    /// Last recorded order of the whole root list.
    pub fn load_root_order(&self) -> Result<Option<Vec<NodeId>>, StorageError> {
        Ok(self.read::<RootOrder>(ROOT_ORDER_KEY)?.map(|o| o.ids))
    }

    /// Stored order for `scope`. Every section shares the root list record.
    pub fn load_order(&self, scope: &OrderScope) -> Result<Option<Vec<NodeId>>, StorageError> {
        match scope {
            OrderScope::Section(_) => self.load_root_order(),
            OrderScope::Parent(parent) => self.read(&node_order_key(parent)),
        }
    }

    /// Record a sibling order and rewrite the matching list snapshot so a
    /// reload shows it. Ids the order does not mention keep their relative
    /// position after the ordered ones.
    ///
    /// Section scopes write the root list; callers pass the full root order.
    pub fn save_order(&self, scope: &OrderScope, ordered: &[NodeId]) -> Result<(), StorageError> {
        match scope {
            OrderScope::Section(_) => {
                let record = RootOrder {
                    ids: ordered.to_vec(),
                    time: chrono::Utc::now().timestamp_millis(),
                };
                self.write(ROOT_ORDER_KEY, &record)?;
                if let Some(nodes) = self.load_root_nodes()? {
                    self.save_root_nodes(&apply_order(nodes, ordered, |n| &n.id))?;
                }
            }
            OrderScope::Parent(parent) => {
                self.write(&node_order_key(parent), ordered)?;
                if let Some(children) = self.load_children(parent)? {
                    self.save_children(parent, &apply_order(children, ordered, |c| &c.id))?;
                }
            }
        }
        self.store.flush()
    }

    /// Push pending writes to the backend's durable storage.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.store.flush()
    }

    pub fn mark_content_loaded(&self, id: &NodeId) -> Result<(), StorageError> {
        self.write(&content_loaded_key(id), &true)
    }

    pub fn is_content_loaded(&self, id: &NodeId) -> Result<bool, StorageError> {
        Ok(self.read::<bool>(&content_loaded_key(id))?.unwrap_or(false))
    }

    pub fn clear_content_loaded(&self, id: &NodeId) -> Result<(), StorageError> {
        self.store.remove(&content_loaded_key(id))
    }
}

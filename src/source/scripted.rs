//! Scripted in-memory `TreeSource` for unit tests.

use super::TreeSource;
use crate::error::ApiError;
use crate::reorder::OrderScope;
use crate::tree::node::{ChildSummary, EmbeddedChild, NodeDetail};
use crate::types::NodeId;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Default)]
pub(crate) struct ScriptedSource {
    children: Mutex<HashMap<NodeId, Result<Option<Vec<ChildSummary>>, String>>>,
    details: Mutex<HashMap<NodeId, NodeDetail>>,
    gates: Mutex<HashMap<NodeId, Arc<Notify>>>,
    persist_failure: Mutex<Option<String>>,
    pub child_calls: Mutex<Vec<NodeId>>,
    pub node_calls: Mutex<Vec<NodeId>>,
    pub persisted: Mutex<Vec<(OrderScope, Vec<NodeId>)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(self, parent: &str, children: &[&str]) -> Self {
        let list = children.iter().map(|id| ChildSummary::new(*id, id.to_uppercase())).collect();
        self.children.lock().insert(NodeId::new(parent), Ok(Some(list)));
        self
    }

    pub fn with_parent(self, id: &str, parent: Option<&str>) -> Self {
        self.details.lock().insert(
            NodeId::new(id),
            NodeDetail {
                id: NodeId::new(id),
                parent_id: parent.map(NodeId::new),
                title: id.to_string(),
                children: Vec::new(),
            },
        );
        self
    }

    pub fn fail_children(&self, parent: &str, message: &str) {
        self.children
            .lock()
            .insert(NodeId::new(parent), Err(message.to_string()));
    }

    pub fn set_children(&self, parent: &str, children: &[&str]) {
        let list = children.iter().map(|id| ChildSummary::new(*id, id.to_uppercase())).collect();
        self.children.lock().insert(NodeId::new(parent), Ok(Some(list)));
    }

    pub fn fail_persist(&self, message: &str) {
        *self.persist_failure.lock() = Some(message.to_string());
    }

    /// Hold `fetch_children(parent)` until the returned handle is notified.
    pub fn gate(&self, parent: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().insert(NodeId::new(parent), Arc::clone(&notify));
        notify
    }

    pub fn child_call_count(&self, parent: &str) -> usize {
        self.child_calls
            .lock()
            .iter()
            .filter(|id| id.as_str() == parent)
            .count()
    }
}

#[async_trait]
impl TreeSource for ScriptedSource {
    async fn fetch_children(&self, parent: &NodeId) -> Result<Option<Vec<ChildSummary>>, ApiError> {
        self.child_calls.lock().push(parent.clone());
        let gate = self.gates.lock().get(parent).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let scripted = self.children.lock().get(parent).cloned();
        match scripted {
            Some(Ok(children)) => Ok(children),
            Some(Err(message)) => Err(ApiError::FetchChildrenFailed {
                parent: parent.clone(),
                message,
            }),
            None => Ok(None),
        }
    }

    /// Scripted children ride along as embedded children, as the page
    /// service returns them with the node.
    async fn fetch_node(&self, id: &NodeId) -> Result<Option<NodeDetail>, ApiError> {
        self.node_calls.lock().push(id.clone());
        let Some(mut detail) = self.details.lock().get(id).cloned() else {
            return Ok(None);
        };
        if let Some(Ok(Some(children))) = self.children.lock().get(id) {
            detail.children = children
                .iter()
                .map(|child| EmbeddedChild {
                    id: Some(child.id.clone()),
                    title: Some(child.title.clone()),
                    icon: Some(child.icon.clone()).filter(|icon| !icon.is_empty()),
                    owner_email: child.owner_email.clone(),
                })
                .collect();
        }
        Ok(Some(detail))
    }

    async fn persist_order(&self, scope: &OrderScope, ordered: &[NodeId]) -> Result<(), ApiError> {
        self.persisted.lock().push((scope.clone(), ordered.to_vec()));
        let failure = self.persist_failure.lock().clone();
        match failure {
            Some(message) => Err(ApiError::PersistFailed {
                scope: scope.to_string(),
                message,
            }),
            None => Ok(()),
        }
    }
}

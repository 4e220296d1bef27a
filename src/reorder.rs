//! Drag reorder
//!
//! A drag session tracks the dragged index and the index under the pointer.
//! Pointer moves only update the hover index; the new order is computed once,
//! on drop, and handed back as a [`ReorderPlan`] for the caller to persist.

use crate::error::ApiError;
use crate::sections::Section;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Sibling group whose order is being changed.
///
/// Root pages are only siblings within the section that lists them, so a
/// root-level drag is scoped to one section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderScope {
    /// Root-level pages of one sidebar section.
    Section(Section),
    /// Children of one page.
    Parent(NodeId),
}

impl OrderScope {
    pub fn parent(&self) -> Option<&NodeId> {
        match self {
            OrderScope::Section(_) => None,
            OrderScope::Parent(id) => Some(id),
        }
    }

    pub fn is_root_level(&self) -> bool {
        matches!(self, OrderScope::Section(_))
    }
}

impl fmt::Display for OrderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderScope::Section(section) => write!(f, "{} root pages", section),
            OrderScope::Parent(id) => write!(f, "children of {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub scope: OrderScope,
    pub source_index: Option<usize>,
    pub hover_index: Option<usize>,
}

/// Ordered ids produced by a drop, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub scope: OrderScope,
    pub ordered: Vec<NodeId>,
}

/// Outcome of the persistence phase of a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReport {
    pub scope: OrderScope,
    pub ordered: Vec<NodeId>,
    /// `None` when the page service accepted the order.
    pub error: Option<String>,
}

impl PersistReport {
    pub fn is_persisted(&self) -> bool {
        self.error.is_none()
    }
}

/// Move the element at `from` so it ends up at index `to`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), ApiError> {
    if from >= items.len() || to >= items.len() {
        return Err(ApiError::InvalidDrag(format!(
            "indices {} -> {} out of range for {} siblings",
            from,
            to,
            items.len()
        )));
    }
    let moved = items.remove(from);
    items.insert(to, moved);
    Ok(())
}

/// Holds at most one drag session at a time.
#[derive(Debug, Default)]
pub struct ReorderCoordinator {
    session: Option<DragSession>,
}

impl ReorderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging the sibling at `index`. Replaces any abandoned session.
    pub fn begin(&mut self, scope: OrderScope, index: usize) {
        debug!(scope = %scope, index, "Drag started");
        self.session = Some(DragSession {
            scope,
            source_index: Some(index),
            hover_index: None,
        });
    }

    /// Record the sibling under the pointer. Returns false with no session.
    pub fn hover(&mut self, index: usize) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.hover_index = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.session = None;
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// End the session and apply the move to `items` in place.
    ///
    /// Returns `Ok(None)` for a no-op drop (no session, an unset index, or
    /// the same source and hover index). The session ends either way.
    pub fn drop_onto<T>(
        &mut self,
        items: &mut Vec<T>,
        id_of: impl Fn(&T) -> &NodeId,
    ) -> Result<Option<ReorderPlan>, ApiError> {
        let Some(session) = self.session.take() else {
            return Ok(None);
        };
        let (from, to) = match (session.source_index, session.hover_index) {
            (Some(from), Some(to)) if from != to => (from, to),
            _ => {
                debug!(scope = %session.scope, "Drop without movement, nothing to reorder");
                return Ok(None);
            }
        };
        move_item(items, from, to)?;
        let ordered = items.iter().map(|item| id_of(item).clone()).collect();
        debug!(scope = %session.scope, from, to, "Applied optimistic reorder");
        Ok(Some(ReorderPlan {
            scope: session.scope,
            ordered,
        }))
    }
}

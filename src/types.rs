//! Core identifier types for the navigation tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by synthetic ids that stand for a work area in the tree.
pub const WORK_AREA_MARKER: &str = "workarea-";

/// NodeId: opaque page identifier assigned by the page service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tree id of the synthetic node that represents a work area.
    pub fn for_work_area(work_area: &WorkAreaId) -> Self {
        Self(format!("{}{}", WORK_AREA_MARKER, work_area.as_str()))
    }

    /// Whether this id is a work-area marker rather than a page.
    pub fn is_work_area(&self) -> bool {
        self.0.starts_with(WORK_AREA_MARKER)
    }

    /// The work area this marker id points at, if it is one.
    pub fn work_area_id(&self) -> Option<WorkAreaId> {
        self.0
            .strip_prefix(WORK_AREA_MARKER)
            .filter(|rest| !rest.is_empty())
            .map(WorkAreaId::new)
    }

    /// Ids the page service cannot resolve (empty, the notes index route).
    pub fn is_fetchable(&self) -> bool {
        !self.0.is_empty() && self.0 != "notes" && self.0 != "undefined" && !self.is_work_area()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// WorkAreaId: identifier of a shared organizational unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkAreaId(String);

impl WorkAreaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkAreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkAreaId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

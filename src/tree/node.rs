//! Page node descriptors, cached child summaries, and work areas.

use crate::types::{NodeId, WorkAreaId};
use serde::{Deserialize, Serialize};

/// Review state of a published page.
///
/// Anything the page service sends besides `pending` or `accepted`
/// (including its legacy `"Publish"` default) reads as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ApprovalStatus {
    Pending,
    Accepted,
    #[default]
    None,
}

impl From<Option<String>> for ApprovalStatus {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("pending") => ApprovalStatus::Pending,
            Some("accepted") => ApprovalStatus::Accepted,
            _ => ApprovalStatus::None,
        }
    }
}

impl From<ApprovalStatus> for Option<String> {
    fn from(value: ApprovalStatus) -> Self {
        match value {
            ApprovalStatus::Pending => Some("pending".to_string()),
            ApprovalStatus::Accepted => Some("accepted".to_string()),
            ApprovalStatus::None => None,
        }
    }
}

/// Storage shape of a page. Database-view notes are rendered by the board
/// views and never listed in the public section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum NoteType {
    #[default]
    Page,
    ViewDatabase,
    Other(String),
}

impl From<Option<String>> for NoteType {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            None | Some("") | Some("original") => NoteType::Page,
            Some("Viewdatabase_Note") => NoteType::ViewDatabase,
            Some(other) => NoteType::Other(other.to_string()),
        }
    }
}

impl From<NoteType> for Option<String> {
    fn from(value: NoteType) -> Self {
        match value {
            NoteType::Page => None,
            NoteType::ViewDatabase => Some("Viewdatabase_Note".to_string()),
            NoteType::Other(other) => Some(other),
        }
    }
}

/// Child summary embedded in a node payload, used to seed the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedChild {
    #[serde(rename = "_id", default)]
    pub id: Option<NodeId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "userEmail", default)]
    pub owner_email: Option<String>,
}

impl EmbeddedChild {
    /// Seeds with a missing id or title are not renderable and are skipped.
    pub fn to_summary(&self) -> Option<ChildSummary> {
        let id = self.id.clone().filter(|id| !id.as_str().is_empty())?;
        let title = self.title.clone().filter(|t| !t.is_empty())?;
        Some(ChildSummary {
            id,
            title,
            icon: self.icon.clone().unwrap_or_default(),
            owner_email: self.owner_email.clone(),
            has_children: false,
        })
    }
}

/// Node: a page descriptor as listed by the page service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "userEmail", alias = "ownerEmail", default)]
    pub owner_email: String,
    #[serde(default)]
    pub is_public_note: bool,
    #[serde(default)]
    pub is_publish: bool,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub note_type: NoteType,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub work_area_id: Option<WorkAreaId>,
    #[serde(default)]
    pub children: Vec<EmbeddedChild>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<WorkAreaId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(WorkAreaId::new))
}

impl Node {
    /// Minimal private page owned by `owner_email`; tests and fixtures build on it.
    pub fn page(id: impl Into<NodeId>, owner_email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            title: String::new(),
            icon: None,
            owner_email: owner_email.into(),
            is_public_note: false,
            is_publish: false,
            approval_status: ApprovalStatus::None,
            is_template: false,
            note_type: NoteType::Page,
            work_area_id: None,
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Summaries of the embedded children that are complete enough to render.
    pub fn embedded_summaries(&self) -> Vec<ChildSummary> {
        self.children
            .iter()
            .filter_map(EmbeddedChild::to_summary)
            .collect()
    }

    pub fn embeds_child(&self, child: &NodeId) -> bool {
        self.children
            .iter()
            .any(|c| c.id.as_ref() == Some(child))
    }

    pub fn summary(&self) -> ChildSummary {
        ChildSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            icon: self.icon.clone().unwrap_or_default(),
            owner_email: Some(self.owner_email.clone()).filter(|e| !e.is_empty()),
            has_children: !self.children.is_empty(),
        }
    }
}

/// ChildSummary: lightweight cached child descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildSummary {
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "userEmail", default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub has_children: bool,
}

impl ChildSummary {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: String::new(),
            owner_email: None,
            has_children: false,
        }
    }
}

/// Page detail returned by a by-id lookup; only the parent link matters here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetail {
    #[serde(rename = "_id", alias = "id")]
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Vec<EmbeddedChild>,
}

impl NodeDetail {
    /// Fetched children keep untitled entries; only an id is required.
    pub fn child_summaries(&self) -> Vec<ChildSummary> {
        self.children
            .iter()
            .filter_map(|child| {
                let id = child.id.clone().filter(|id| !id.as_str().is_empty())?;
                Some(ChildSummary {
                    id,
                    title: child.title.clone().unwrap_or_default(),
                    icon: child.icon.clone().unwrap_or_default(),
                    owner_email: child.owner_email.clone(),
                    has_children: false,
                })
            })
            .collect()
    }
}

/// Who may see a work area's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    Open,
    Closed,
    Private,
}

/// WorkArea: named grouping of members and root-level pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkArea {
    #[serde(rename = "_id", alias = "id")]
    pub id: WorkAreaId,
    pub name: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub access_level: AccessLevel,
}

impl WorkArea {
    pub fn tree_id(&self) -> NodeId {
        NodeId::for_work_area(&self.id)
    }

    /// Whether `node` is one of this work area's root pages.
    pub fn owns_root(&self, node: &Node) -> bool {
        node.parent_id.is_none() && node.work_area_id.as_ref() == Some(&self.id)
    }
}

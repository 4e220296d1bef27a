//! Sidebar sections
//!
//! Splits the node collection into the seven navigational buckets. Each node
//! lands in at most one bucket: predicates are tried in [`PRECEDENCE`] order
//! and the first match wins. Nodes matching none are reported, not dropped
//! silently.

use crate::tree::node::{ApprovalStatus, Node, NoteType};
use crate::types::{NodeId, WorkAreaId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// One navigational bucket of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Template,
    InReview,
    Published,
    Public,
    Private,
    Shared,
    WorkAreaRoot,
}

impl Section {
    /// Whether pages in this section have an ancestor chain worth revealing.
    /// Review and published lists are flat.
    pub fn is_hierarchical(self) -> bool {
        !matches!(self, Section::InReview | Section::Published)
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Template => "Templates",
            Section::InReview => "In Review",
            Section::Published => "Published",
            Section::Public => "Public",
            Section::Private => "Private",
            Section::Shared => "Shared",
            Section::WorkAreaRoot => "Work Areas",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Publication state folded from `is_publish` and `approval_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Publication {
    Unpublished,
    Pending,
    Accepted,
    /// Published flag set without a recognised review state.
    Unreviewed,
}

impl Publication {
    fn of(node: &Node) -> Self {
        match (node.is_publish, node.approval_status) {
            (false, _) => Publication::Unpublished,
            (true, ApprovalStatus::Pending) => Publication::Pending,
            (true, ApprovalStatus::Accepted) => Publication::Accepted,
            (true, ApprovalStatus::None) => Publication::Unreviewed,
        }
    }
}

/// Inputs the predicates need besides the node itself.
#[derive(Debug, Clone, Copy)]
pub struct PartitionContext<'a> {
    pub current_user_email: &'a str,
    pub work_area_ids: &'a HashSet<WorkAreaId>,
}

impl<'a> PartitionContext<'a> {
    pub fn new(current_user_email: &'a str, work_area_ids: &'a HashSet<WorkAreaId>) -> Self {
        Self {
            current_user_email,
            work_area_ids,
        }
    }

    fn owns(&self, node: &Node) -> bool {
        node.owner_email == self.current_user_email
    }
}

type Predicate = fn(&Node, &PartitionContext<'_>) -> bool;

/// Section predicates in precedence order.
pub const PRECEDENCE: [(Section, Predicate); 7] = [
    (Section::Template, is_template),
    (Section::InReview, is_in_review),
    (Section::Published, is_published),
    (Section::Public, is_public),
    (Section::Private, is_private),
    (Section::Shared, is_shared),
    (Section::WorkAreaRoot, is_work_area_root),
];

fn is_template(node: &Node, _: &PartitionContext<'_>) -> bool {
    node.is_template
}

fn is_in_review(node: &Node, _: &PartitionContext<'_>) -> bool {
    Publication::of(node) == Publication::Pending
}

fn is_published(node: &Node, _: &PartitionContext<'_>) -> bool {
    Publication::of(node) == Publication::Accepted
}

fn is_public(node: &Node, _: &PartitionContext<'_>) -> bool {
    match (Publication::of(node), &node.note_type) {
        (Publication::Unpublished, NoteType::ViewDatabase) => false,
        (Publication::Unpublished, _) => node.is_public_note,
        _ => false,
    }
}

fn is_private(node: &Node, ctx: &PartitionContext<'_>) -> bool {
    Publication::of(node) == Publication::Unpublished
        && !node.is_public_note
        && ctx.owns(node)
        && node.work_area_id.is_none()
}

fn is_shared(node: &Node, ctx: &PartitionContext<'_>) -> bool {
    Publication::of(node) == Publication::Unpublished && !node.is_public_note && !ctx.owns(node)
}

fn is_work_area_root(node: &Node, ctx: &PartitionContext<'_>) -> bool {
    match (&node.parent_id, &node.work_area_id) {
        (None, Some(work_area)) => ctx.work_area_ids.contains(work_area),
        _ => false,
    }
}

/// Section for `node`, or `None` when no predicate matches.
pub fn classify(node: &Node, ctx: &PartitionContext<'_>) -> Option<Section> {
    PRECEDENCE
        .iter()
        .find(|(_, predicate)| predicate(node, ctx))
        .map(|(section, _)| *section)
}

/// Every section whose predicate holds for `node`, in precedence order.
pub fn matching_sections(node: &Node, ctx: &PartitionContext<'_>) -> Vec<Section> {
    PRECEDENCE
        .iter()
        .filter(|(_, predicate)| predicate(node, ctx))
        .map(|(section, _)| *section)
        .collect()
}

/// Partitioned node collection, each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sections {
    pub work_area_roots: Vec<Node>,
    pub public: Vec<Node>,
    pub private: Vec<Node>,
    pub shared: Vec<Node>,
    pub template: Vec<Node>,
    pub in_review: Vec<Node>,
    pub published: Vec<Node>,
    /// Ids that matched no predicate.
    pub unclassified: Vec<NodeId>,
}

impl Sections {
    pub fn bucket(&self, section: Section) -> &[Node] {
        match section {
            Section::Template => &self.template,
            Section::InReview => &self.in_review,
            Section::Published => &self.published,
            Section::Public => &self.public,
            Section::Private => &self.private,
            Section::Shared => &self.shared,
            Section::WorkAreaRoot => &self.work_area_roots,
        }
    }

    fn bucket_mut(&mut self, section: Section) -> &mut Vec<Node> {
        match section {
            Section::Template => &mut self.template,
            Section::InReview => &mut self.in_review,
            Section::Published => &mut self.published,
            Section::Public => &mut self.public,
            Section::Private => &mut self.private,
            Section::Shared => &mut self.shared,
            Section::WorkAreaRoot => &mut self.work_area_roots,
        }
    }

    /// Section holding `id`, if any.
    pub fn section_of(&self, id: &NodeId) -> Option<Section> {
        PRECEDENCE
            .iter()
            .map(|(section, _)| *section)
            .find(|section| self.bucket(*section).iter().any(|n| &n.id == id))
    }

    /// Root pages of one work area, in collection order.
    pub fn work_area_pages<'s>(&'s self, work_area: &'s WorkAreaId) -> impl Iterator<Item = &'s Node> + 's {
        self.work_area_roots
            .iter()
            .filter(move |n| n.work_area_id.as_ref() == Some(work_area))
    }

    pub fn classified_len(&self) -> usize {
        PRECEDENCE
            .iter()
            .map(|(section, _)| self.bucket(*section).len())
            .sum()
    }
}

/// Partition `nodes` into sections.
pub fn partition(nodes: &[Node], ctx: &PartitionContext<'_>) -> Sections {
    let mut sections = Sections::default();
    for node in nodes {
        match classify(node, ctx) {
            Some(section) => sections.bucket_mut(section).push(node.clone()),
            None => {
                debug!(node_id = %node.id, "Node matches no sidebar section");
                sections.unclassified.push(node.id.clone());
            }
        }
    }
    sections
}

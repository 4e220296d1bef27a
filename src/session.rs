//! Sidebar Session
//!
//! Owns everything one sidebar instance needs: the node collection, work
//! areas, the children cache, expansion, in-flight fetch markers, resolution
//! cooldowns, the current selection, and the collaborators (page source and
//! offline snapshot). Built when the sidebar mounts and dropped with it.
//!
//! Locks are never held across an await. State read before a suspension is
//! re-checked after it before anything is applied.

use crate::concurrency::FetchTracker;
use crate::config::{SidebarConfig, TreeConfig};
use crate::error::ApiError;
use crate::menu::{ActionMenu, MenuPositioner, MenuSize, Rect, Viewport};
use crate::reorder::{OrderScope, PersistReport, ReorderCoordinator};
use crate::resolver::{AncestorPath, PathResolver, RecentResolutions};
use crate::sections::{partition, PartitionContext, Section, Sections};
use crate::source::{HttpTreeSource, TreeSource};
use crate::store::persistence::default_snapshot_path;
use crate::store::{OfflineSnapshot, SledSnapshotStore};
use crate::tree::node::{ChildSummary, Node, WorkArea};
use crate::tree::{Flip, TreeState};
use crate::types::{NodeId, WorkAreaId};
use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// What a toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Collapsed,
    /// Expanded; children were already cached.
    Expanded,
    /// Expanded a work area; its pages were cached without a fetch.
    ExpandedWorkArea { pages: usize },
    /// Expanded and fetched `count` children.
    Fetched { count: usize },
    /// Expanded while a fetch for the node was already running.
    AlreadyFetching,
    /// Expanded, but the page service reports the node inaccessible.
    Inaccessible,
    /// Expanded an id the page service cannot resolve.
    NotFetchable,
    /// The fetch failed; the node was collapsed again.
    Failed(String),
}

/// Why a reveal did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The target lives in a flat section with no ancestor chain.
    NonHierarchical(Section),
    /// Resolved inside the cooldown and its content is loaded.
    RecentlyResolved,
}

/// Result of selecting a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    Revealed { path: AncestorPath, newly_expanded: usize },
    Skipped(SkipReason),
    /// Selection moved on while the walk was running; nothing applied.
    Superseded,
    /// A work-area id was selected and toggled instead.
    ToggledWorkArea(ToggleOutcome),
}

enum Population {
    Cached,
    Fetched(usize),
    InFlight,
    Inaccessible,
    NotFetchable,
    Failed(String),
}

/// One mounted sidebar.
pub struct SidebarSession {
    user_email: String,
    tree_config: TreeConfig,
    menu_size: MenuSize,
    positioner: MenuPositioner,
    source: Arc<dyn TreeSource>,
    snapshot: OfflineSnapshot,
    nodes: RwLock<Vec<Node>>,
    work_areas: RwLock<Vec<WorkArea>>,
    state: RwLock<TreeState>,
    fetches: FetchTracker,
    recent: Mutex<RecentResolutions>,
    selected: RwLock<Option<NodeId>>,
    reorder: Mutex<ReorderCoordinator>,
}

impl SidebarSession {
    pub fn new(
        source: Arc<dyn TreeSource>,
        snapshot: OfflineSnapshot,
        config: &SidebarConfig,
        user_email: impl Into<String>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            tree_config: config.tree.clone(),
            menu_size: MenuSize {
                width: config.menu.default_width,
                height: config.menu.default_height,
            },
            positioner: MenuPositioner::from_config(&config.menu),
            source,
            snapshot,
            nodes: RwLock::new(Vec::new()),
            work_areas: RwLock::new(Vec::new()),
            state: RwLock::new(TreeState::new()),
            fetches: FetchTracker::new(),
            recent: Mutex::new(RecentResolutions::new(config.tree.resolve_cooldown())),
            selected: RwLock::new(None),
            reorder: Mutex::new(ReorderCoordinator::new()),
        }
    }

    /// HTTP source and on-disk snapshot, both taken from `config`.
    pub fn from_config(config: &SidebarConfig, user_email: impl Into<String>) -> Result<Self, ApiError> {
        let source = HttpTreeSource::new(&config.source)?;
        let path = match &config.snapshot.path {
            Some(path) => path.clone(),
            None => default_snapshot_path()?,
        };
        let store = SledSnapshotStore::open(&path)?;
        info!(path = %path.display(), "Opened offline snapshot");
        Ok(Self::new(
            Arc::new(source),
            OfflineSnapshot::new(Arc::new(store)),
            config,
            user_email,
        ))
    }

    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    pub fn snapshot(&self) -> &OfflineSnapshot {
        &self.snapshot
    }

    /// Replace the node collection, seed the cache from embedded children,
    /// and write the root list to the offline snapshot.
    pub fn set_nodes(&self, nodes: Vec<Node>) -> Result<usize, ApiError> {
        let seeded = {
            let mut state = self.state.write();
            state.cache.seed_from_roots(nodes.iter().filter(|n| n.is_root())).len()
        };
        let roots: Vec<Node> = nodes.iter().filter(|n| n.is_root()).cloned().collect();
        *self.nodes.write() = nodes;
        self.snapshot.save_root_nodes(&roots)?;
        debug!(roots = roots.len(), seeded, "Node collection replaced");
        Ok(seeded)
    }

    /// Restore the root list and any snapshotted children lists.
    ///
    /// Returns the number of root nodes loaded; zero when no snapshot exists.
    pub fn load_offline(&self) -> Result<usize, ApiError> {
        let Some(roots) = self.snapshot.load_root_nodes()? else {
            debug!("No offline snapshot of root nodes");
            return Ok(0);
        };
        let mut restored = Vec::new();
        for root in &roots {
            if let Some(children) = self.snapshot.load_children(&root.id)? {
                restored.push((root.id.clone(), children));
            }
        }
        {
            let mut state = self.state.write();
            for (parent, children) in restored {
                state.cache.set(parent, children);
            }
            state.cache.seed_from_roots(roots.iter());
        }
        let count = roots.len();
        *self.nodes.write() = roots;
        info!(roots = count, "Loaded sidebar from offline snapshot");
        Ok(count)
    }

    pub fn set_work_areas(&self, work_areas: Vec<WorkArea>) {
        *self.work_areas.write() = work_areas;
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.read().clone()
    }

    pub fn work_areas(&self) -> Vec<WorkArea> {
        self.work_areas.read().clone()
    }

    /// Partition the current collection for this session's user.
    pub fn sections(&self) -> Sections {
        let ids: HashSet<WorkAreaId> = self.work_areas.read().iter().map(|w| w.id.clone()).collect();
        let nodes = self.nodes.read();
        partition(&nodes, &PartitionContext::new(&self.user_email, &ids))
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.state.read().expansion.is_expanded(id)
    }

    pub fn expanded(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.state.read().expansion.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn children_of(&self, parent: &NodeId) -> Option<Vec<ChildSummary>> {
        self.state.read().cache.get(parent).map(<[ChildSummary]>::to_vec)
    }

    pub fn fetch_error(&self, parent: &NodeId) -> Option<String> {
        self.state.read().fetch_errors.get(parent).cloned()
    }

    pub fn is_fetching(&self, parent: &NodeId) -> bool {
        self.fetches.is_in_flight(parent)
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected.read().clone()
    }

    /// Flip expansion of `id`, fetching its children on first expand.
    pub async fn toggle(&self, id: &NodeId) -> ToggleOutcome {
        let flip = self.state.write().expansion.flip(id);
        if flip == Flip::Collapsed {
            debug!(node_id = %id, "Collapsed");
            return ToggleOutcome::Collapsed;
        }

        if let Some(work_area) = id.work_area_id() {
            let pages = self.cache_work_area(id, &work_area);
            return ToggleOutcome::ExpandedWorkArea { pages };
        }

        match self.populate(id, false).await {
            Population::Cached => ToggleOutcome::Expanded,
            Population::Fetched(count) => ToggleOutcome::Fetched { count },
            Population::InFlight => ToggleOutcome::AlreadyFetching,
            Population::Inaccessible => ToggleOutcome::Inaccessible,
            Population::NotFetchable => ToggleOutcome::NotFetchable,
            Population::Failed(message) => {
                if self.state.write().expansion.collapse(id) {
                    debug!(node_id = %id, "Collapsed after failed fetch");
                }
                ToggleOutcome::Failed(message)
            }
        }
    }

    /// Fetch `parent`'s children even if cached, replacing the entry.
    pub async fn refetch_children(&self, parent: &NodeId) -> Result<usize, ApiError> {
        match self.populate(parent, true).await {
            Population::Fetched(count) => Ok(count),
            Population::Cached | Population::InFlight => Ok(0),
            Population::Inaccessible => Err(ApiError::NodeNotFound(parent.clone())),
            Population::NotFetchable => Err(ApiError::InvalidNode(parent.clone())),
            Population::Failed(message) => Err(ApiError::FetchChildrenFailed {
                parent: parent.clone(),
                message,
            }),
        }
    }

    /// Select `id` and expand the tree down to it.
    ///
    /// Work-area ids are not pages; selecting one toggles it.
    pub async fn select(&self, id: NodeId) -> RevealOutcome {
        if id.is_work_area() {
            return RevealOutcome::ToggledWorkArea(self.toggle(&id).await);
        }
        *self.selected.write() = Some(id.clone());
        self.reveal(&id).await
    }

    /// Mark `id`'s content as loaded; pairs with the resolution cooldown.
    pub fn mark_content_loaded(&self, id: &NodeId) -> Result<(), ApiError> {
        self.snapshot.mark_content_loaded(id)?;
        Ok(())
    }

    async fn reveal(&self, target: &NodeId) -> RevealOutcome {
        if let Some(section) = self.sections().section_of(target) {
            if !section.is_hierarchical() {
                debug!(node_id = %target, section = %section, "Flat section, no ancestors to reveal");
                return RevealOutcome::Skipped(SkipReason::NonHierarchical(section));
            }
        }

        let content_loaded = self.snapshot.is_content_loaded(target).unwrap_or_else(|e| {
            warn!(node_id = %target, error = %e, "Could not read content marker");
            false
        });
        let now = Instant::now();
        {
            let mut recent = self.recent.lock();
            if recent.should_skip(target, content_loaded, now) {
                debug!(node_id = %target, "Resolved recently, skipping");
                return RevealOutcome::Skipped(SkipReason::RecentlyResolved);
            }
            recent.record(target.clone(), now);
        }

        let nodes = self.nodes();
        let path = PathResolver::new(self.source.as_ref(), self.tree_config.max_ancestor_depth)
            .resolve(target, &self.state, &nodes)
            .await;

        if !self.is_still_selected(target) {
            debug!(node_id = %target, "Selection changed during resolution");
            return RevealOutcome::Superseded;
        }

        let newly_expanded = self
            .state
            .write()
            .expansion
            .expand_all(path.ancestors.iter(), target);

        let fetches = path
            .ancestors
            .iter()
            .filter(|ancestor| !ancestor.is_work_area())
            .map(|ancestor| async move { (ancestor, self.populate(ancestor, false).await) });
        for (ancestor, population) in join_all(fetches).await {
            if let Population::Failed(message) = population {
                debug!(node_id = %ancestor, error = %message, "Ancestor children unavailable");
            }
        }

        info!(node_id = %target, ancestors = path.ancestors.len(), newly_expanded, "Revealed node");
        RevealOutcome::Revealed { path, newly_expanded }
    }

    fn is_still_selected(&self, target: &NodeId) -> bool {
        self.selected.read().as_ref() == Some(target)
    }

    /// Work-area children are the collection's root pages tagged with the
    /// work area's id, in collection order. [`WorkArea`] carries no page list
    /// of its own, so the node collection is the only source.
    fn cache_work_area(&self, id: &NodeId, work_area: &WorkAreaId) -> usize {
        let pages: Vec<ChildSummary> = self
            .nodes
            .read()
            .iter()
            .filter(|n| n.is_root() && n.work_area_id.as_ref() == Some(work_area))
            .map(Node::summary)
            .collect();
        let count = pages.len();
        self.state.write().cache.set(id.clone(), pages);
        debug!(work_area = %work_area, pages = count, "Cached work area pages");
        count
    }

    async fn populate(&self, parent: &NodeId, force: bool) -> Population {
        if !parent.is_fetchable() {
            return Population::NotFetchable;
        }
        if !force && self.state.read().cache.has(parent) {
            return Population::Cached;
        }
        let Some(_guard) = self.fetches.begin(parent) else {
            debug!(node_id = %parent, "Fetch already in flight");
            return Population::InFlight;
        };
        if !force && self.state.read().cache.has(parent) {
            return Population::Cached;
        }

        debug!(node_id = %parent, "Fetching children");
        match self.source.fetch_children(parent).await {
            Ok(Some(children)) => {
                let count = children.len();
                if let Err(e) = self.snapshot.save_children(parent, &children) {
                    warn!(node_id = %parent, error = %e, "Could not snapshot children");
                }
                let mut state = self.state.write();
                state.fetch_errors.remove(parent);
                state.cache.set(parent.clone(), children);
                Population::Fetched(count)
            }
            Ok(None) => {
                debug!(node_id = %parent, "Node inaccessible, nothing cached");
                Population::Inaccessible
            }
            Err(e) => {
                let message = e.to_string();
                warn!(node_id = %parent, error = %message, "Fetching children failed");
                self.state
                    .write()
                    .fetch_errors
                    .insert(parent.clone(), message.clone());
                Population::Failed(message)
            }
        }
    }

    pub fn begin_drag(&self, scope: OrderScope, index: usize) {
        self.reorder.lock().begin(scope, index);
    }

    pub fn hover(&self, index: usize) -> bool {
        self.reorder.lock().hover(index)
    }

    pub fn cancel_drag(&self) {
        self.reorder.lock().cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.reorder.lock().is_dragging()
    }

    /// End the drag: apply the new order locally, mirror it to the offline
    /// snapshot, then persist it.
    ///
    /// A section drop reorders only that section's root pages; pages of other
    /// sections keep their slots in the collection. `Ok(None)` is a no-op
    /// drop. A persist failure keeps the local order and comes back in the
    /// report.
    pub async fn drop_reorder(&self) -> Result<Option<PersistReport>, ApiError> {
        let Some(scope) = self.reorder.lock().session().map(|s| s.scope.clone()) else {
            return Ok(None);
        };
        let (plan, mirrored) = match &scope {
            OrderScope::Section(section) => {
                let mut siblings: Vec<Node> = self
                    .sections()
                    .bucket(*section)
                    .iter()
                    .filter(|n| n.is_root())
                    .cloned()
                    .collect();
                let Some(plan) = self.reorder.lock().drop_onto(&mut siblings, |n| &n.id)? else {
                    return Ok(None);
                };
                let members: HashSet<NodeId> = siblings.iter().map(|n| n.id.clone()).collect();
                let mut nodes = self.nodes.write();
                let mut reordered = siblings.into_iter();
                for slot in nodes.iter_mut().filter(|n| members.contains(&n.id)) {
                    if let Some(node) = reordered.next() {
                        *slot = node;
                    }
                }
                let root_order: Vec<NodeId> = nodes.iter().filter(|n| n.is_root()).map(|n| n.id.clone()).collect();
                (plan, root_order)
            }
            OrderScope::Parent(parent) => {
                let mut state = self.state.write();
                let mut children = state.cache.get(parent).map(<[ChildSummary]>::to_vec).unwrap_or_default();
                let Some(plan) = self.reorder.lock().drop_onto(&mut children, |c| &c.id)? else {
                    return Ok(None);
                };
                state.cache.set(parent.clone(), children);
                let ordered = plan.ordered.clone();
                (plan, ordered)
            }
        };

        if let Err(e) = self.snapshot.save_order(&plan.scope, &mirrored) {
            warn!(scope = %plan.scope, error = %e, "Could not mirror order to snapshot");
        }

        let error = match self.source.persist_order(&plan.scope, &plan.ordered).await {
            Ok(()) => {
                debug!(scope = %plan.scope, count = plan.ordered.len(), "Order persisted");
                None
            }
            Err(e) => {
                warn!(scope = %plan.scope, error = %e, "Persisting order failed, keeping local order");
                Some(e.to_string())
            }
        };
        Ok(Some(PersistReport {
            scope: plan.scope,
            ordered: plan.ordered,
            error,
        }))
    }

    pub fn add_child(&self, parent: &NodeId, child: ChildSummary) {
        self.state.write().cache.add_child(parent, child);
    }

    /// Rename or re-icon a node everywhere it is shown.
    pub fn update_node(&self, id: &NodeId, title: &str, icon: &str) -> usize {
        if let Some(node) = self.nodes.write().iter_mut().find(|n| &n.id == id) {
            node.title = title.to_string();
            node.icon = Some(icon.to_string()).filter(|i| !i.is_empty());
        }
        self.state.write().cache.update_node(id, title, icon)
    }

    /// Forget a deleted node.
    pub fn remove_node(&self, id: &NodeId) {
        self.nodes.write().retain(|n| &n.id != id);
        let mut state = self.state.write();
        state.cache.remove_node(id);
        state.expansion.collapse(id);
        state.fetch_errors.remove(id);
    }

    /// Open the action menu for `node` at the configured default size.
    pub fn open_menu(&self, node: NodeId, trigger: Rect, viewport: Viewport) -> ActionMenu {
        ActionMenu::open(node, trigger, self.menu_size, viewport, self.positioner)
    }
}

impl Drop for SidebarSession {
    fn drop(&mut self) {
        if let Err(e) = self.snapshot.flush() {
            warn!(error = %e, "Could not flush offline snapshot on teardown");
        }
    }
}

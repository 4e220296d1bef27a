//! Offline snapshot persisted with sled across sessions.

use crate::support::{ids, PageTree};
use canopy::config::SidebarConfig;
use canopy::reorder::OrderScope;
use canopy::sections::Section;
use canopy::session::SidebarSession;
use canopy::store::{OfflineSnapshot, SledSnapshotStore};
use canopy::tree::Node;
use canopy::types::NodeId;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const ME: &str = "me@x.io";

fn open(path: &Path, source: Arc<PageTree>) -> SidebarSession {
    let store = SledSnapshotStore::open(path).unwrap();
    SidebarSession::new(
        source,
        OfflineSnapshot::new(Arc::new(store)),
        &SidebarConfig::default(),
        ME,
    )
}

#[tokio::test]
async fn reordered_roots_survive_restart() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snapshot");
    let source = Arc::new(PageTree::new().page("x", None).page("y", None).page("z", None));

    {
        let session = open(&path, source.clone());
        session
            .set_nodes(vec![Node::page("x", ME), Node::page("y", ME), Node::page("z", ME)])
            .unwrap();
        session.begin_drag(OrderScope::Section(Section::Private), 2);
        session.hover(0);
        let report = session.drop_reorder().await.unwrap().unwrap();
        assert_eq!(report.ordered, ids(&["z", "x", "y"]));
        assert_eq!(
            *source.persisted.lock(),
            vec![(OrderScope::Section(Section::Private), ids(&["z", "x", "y"]))]
        );
    }

    let session = open(&path, source);
    assert_eq!(session.load_offline().unwrap(), 3);
    let restored: Vec<NodeId> = session.nodes().into_iter().map(|n| n.id).collect();
    assert_eq!(restored, ids(&["z", "x", "y"]));
    assert_eq!(
        session.snapshot().load_root_order().unwrap(),
        Some(ids(&["z", "x", "y"]))
    );
}

#[tokio::test]
async fn fetched_children_are_available_offline() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snapshot");
    let source = Arc::new(PageTree::new().page("r", None).page("c1", Some("r")).page("c2", Some("r")));

    {
        let session = open(&path, source.clone());
        session.set_nodes(vec![Node::page("r", ME)]).unwrap();
        session.toggle(&NodeId::new("r")).await;
    }

    let session = open(&path, source.clone());
    session.load_offline().unwrap();
    let children: Vec<NodeId> = session
        .children_of(&NodeId::new("r"))
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(children, ids(&["c1", "c2"]));

    // Cached offline, so the first expand after restart does not fetch.
    session.toggle(&NodeId::new("r")).await;
    assert_eq!(source.child_fetch_count(), 1);
}

#[test]
fn empty_store_loads_nothing() {
    let temp = TempDir::new().unwrap();
    let session = open(&temp.path().join("snapshot"), Arc::new(PageTree::new()));
    assert_eq!(session.load_offline().unwrap(), 0);
    assert!(session.nodes().is_empty());
}

//! Sidebar session driven end to end against an in-memory page tree.

use crate::support::{ids, PageTree};
use canopy::config::SidebarConfig;
use canopy::reorder::OrderScope;
use canopy::sections::Section;
use canopy::session::{RevealOutcome, SidebarSession, ToggleOutcome};
use canopy::store::OfflineSnapshot;
use canopy::tree::{AccessLevel, ApprovalStatus, Node, WorkArea};
use canopy::types::{NodeId, WorkAreaId};
use std::sync::Arc;

const ME: &str = "me@x.io";

fn tree() -> Arc<PageTree> {
    Arc::new(
        PageTree::new()
            .page("root", None)
            .page("a", Some("root"))
            .page("b", Some("root"))
            .page("a1", Some("a"))
            .page("a1x", Some("a1")),
    )
}

fn session(source: Arc<PageTree>) -> SidebarSession {
    SidebarSession::new(source, OfflineSnapshot::in_memory(), &SidebarConfig::default(), ME)
}

#[tokio::test]
async fn deep_selection_expands_every_ancestor() {
    let source = tree();
    let session = session(source.clone());
    session.set_nodes(vec![Node::page("root", ME)]).unwrap();

    let outcome = session.select(NodeId::new("a1x")).await;

    let RevealOutcome::Revealed { path, .. } = outcome else {
        panic!("expected reveal, got {:?}", outcome);
    };
    assert_eq!(path.ancestors, ids(&["a1", "a", "root"]));
    assert_eq!(session.expanded(), ids(&["a", "a1", "root"]));
    assert!(!session.is_expanded(&NodeId::new("a1x")));
    for parent in ["root", "a", "a1"] {
        assert!(session.children_of(&NodeId::new(parent)).is_some(), "{} not cached", parent);
    }
    // Ancestors looked up by id arrive with their children; only the root
    // page, already in the collection, needs a children request.
    assert_eq!(source.child_fetch_count(), 1);
}

#[tokio::test]
async fn concurrent_toggles_of_one_node_fetch_once() {
    let source = tree();
    let session = session(source.clone());
    let root = NodeId::new("root");

    let (first, second) = tokio::join!(session.toggle(&root), async {
        tokio::task::yield_now().await;
        session.toggle(&root).await
    });

    assert_eq!(first, ToggleOutcome::Fetched { count: 2 });
    assert_eq!(second, ToggleOutcome::Collapsed);
    assert_eq!(source.child_fetch_count(), 1);
}

#[tokio::test]
async fn sections_follow_precedence_and_work_areas() {
    let session = session(tree());
    let mut template = Node::page("tpl", ME);
    template.is_template = true;
    template.is_publish = true;
    template.approval_status = ApprovalStatus::Accepted;
    let mut team = Node::page("team-page", ME);
    team.work_area_id = Some(WorkAreaId::new("w1"));
    let mut public = Node::page("pub", "other@x.io");
    public.is_public_note = true;
    session
        .set_nodes(vec![template, team, public, Node::page("mine", ME), Node::page("theirs", "other@x.io")])
        .unwrap();
    session.set_work_areas(vec![WorkArea {
        id: WorkAreaId::new("w1"),
        name: "Design".to_string(),
        owner_id: "u1".to_string(),
        members: vec![],
        access_level: AccessLevel::Open,
    }]);

    let sections = session.sections();
    assert_eq!(sections.section_of(&NodeId::new("tpl")), Some(Section::Template));
    assert_eq!(sections.section_of(&NodeId::new("team-page")), Some(Section::WorkAreaRoot));
    assert_eq!(sections.section_of(&NodeId::new("pub")), Some(Section::Public));
    assert_eq!(sections.section_of(&NodeId::new("mine")), Some(Section::Private));
    assert_eq!(sections.section_of(&NodeId::new("theirs")), Some(Section::Shared));

    let marker = NodeId::for_work_area(&WorkAreaId::new("w1"));
    assert_eq!(
        session.toggle(&marker).await,
        ToggleOutcome::ExpandedWorkArea { pages: 1 }
    );
}

#[tokio::test]
async fn reorder_then_refetch_reconciles_with_service() {
    let source = tree();
    let session = session(source.clone());
    let root = NodeId::new("root");
    session.toggle(&root).await;

    session.begin_drag(OrderScope::Parent(root.clone()), 1);
    session.hover(0);
    let report = session.drop_reorder().await.unwrap().unwrap();
    assert!(report.is_persisted());
    assert_eq!(report.ordered, ids(&["b", "a"]));
    assert_eq!(source.persisted.lock().len(), 1);

    // The in-memory service ignores orders, so a refetch restores its view.
    assert_eq!(session.refetch_children(&root).await.unwrap(), 2);
    let children: Vec<NodeId> = session
        .children_of(&root)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(children, ids(&["a", "b"]));
}

#[tokio::test]
async fn unknown_page_reveals_nothing_and_does_not_fail() {
    let session = session(tree());
    let outcome = session.select(NodeId::new("ghost")).await;
    let RevealOutcome::Revealed { path, newly_expanded } = outcome else {
        panic!("expected best-effort reveal, got {:?}", outcome);
    };
    assert!(path.ancestors.is_empty());
    assert_eq!(newly_expanded, 0);
}

#[tokio::test]
async fn refetch_of_invalid_id_is_an_error() {
    let session = session(tree());
    assert!(session.refetch_children(&NodeId::new("notes")).await.is_err());
}

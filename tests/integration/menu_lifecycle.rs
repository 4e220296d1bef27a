//! Action menu opened through a session, driven by pointer and layout events.

use crate::support::PageTree;
use canopy::config::SidebarConfig;
use canopy::menu::{CloseReason, Key, MenuAction, MenuEvent, MenuUpdate, Rect, Viewport};
use canopy::session::SidebarSession;
use canopy::store::OfflineSnapshot;
use canopy::types::NodeId;
use std::sync::Arc;

const VIEW: Viewport = Viewport {
    width: 1280.0,
    height: 720.0,
};

fn session() -> SidebarSession {
    SidebarSession::new(
        Arc::new(PageTree::new()),
        OfflineSnapshot::in_memory(),
        &SidebarConfig::default(),
        "me@x.io",
    )
}

fn inside(rect: Rect, viewport: Viewport) -> bool {
    rect.left >= 0.0 && rect.top >= 0.0 && rect.right() <= viewport.width && rect.bottom() <= viewport.height
}

#[test]
fn menu_stays_inside_viewport_while_tracking_trigger() {
    let mut menu = session().open_menu(NodeId::new("n"), Rect::new(1200.0, 40.0, 24.0, 24.0), VIEW);
    assert!(inside(menu.bounds(), VIEW));
    assert!(!menu.placement().flipped);

    let update = menu.handle(MenuEvent::Scroll {
        trigger: Rect::new(1200.0, 680.0, 24.0, 24.0),
    });
    let MenuUpdate::Moved(placement) = update else {
        panic!("expected the menu to move, got {:?}", update);
    };
    assert!(placement.flipped);
    assert!(inside(menu.bounds(), VIEW));
}

#[test]
fn pointer_inside_keeps_menu_open_and_outside_closes_it() {
    let mut menu = session().open_menu(NodeId::new("n"), Rect::new(100.0, 100.0, 24.0, 24.0), VIEW);
    let bounds = menu.bounds();
    assert_eq!(
        menu.handle(MenuEvent::PointerDown {
            x: bounds.left + 1.0,
            y: bounds.top + 1.0
        }),
        MenuUpdate::Unchanged
    );
    assert_eq!(
        menu.handle(MenuEvent::PointerDown { x: 900.0, y: 600.0 }),
        MenuUpdate::Closed(CloseReason::OutsidePointer)
    );
}

#[test]
fn escape_and_actions_close() {
    let session = session();
    let trigger = Rect::new(10.0, 10.0, 24.0, 24.0);
    let mut menu = session.open_menu(NodeId::new("n"), trigger, VIEW);
    assert_eq!(
        menu.handle(MenuEvent::KeyDown(Key::Escape)),
        MenuUpdate::Closed(CloseReason::Escape)
    );
    let mut menu = session.open_menu(NodeId::new("n"), trigger, VIEW);
    assert_eq!(
        menu.handle(MenuEvent::Action(MenuAction::Rename)),
        MenuUpdate::Closed(CloseReason::Action(MenuAction::Rename))
    );
    assert_eq!(menu.node(), &NodeId::new("n"));
}

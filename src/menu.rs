//! Per-node action menu placement and lifecycle.

use crate::config::MenuConfig;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Screen rectangle in CSS pixels, origin at the viewport's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub top: f32,
    pub left: f32,
    /// Opened above the trigger because there was no room below.
    pub flipped: bool,
}

impl Placement {
    pub fn rect(&self, menu: MenuSize) -> Rect {
        Rect::new(self.left, self.top, menu.width, menu.height)
    }
}

/// Viewport-aware placement with a fixed edge margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuPositioner {
    pub margin: f32,
}

impl Default for MenuPositioner {
    fn default() -> Self {
        Self { margin: 8.0 }
    }
}

impl MenuPositioner {
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    pub fn from_config(config: &MenuConfig) -> Self {
        Self::new(config.margin)
    }

    /// Below the trigger, left edges aligned. Flips above when the bottom
    /// would overflow; shifts left when the right edge would cross the margin.
    pub fn place(&self, trigger: Rect, menu: MenuSize, viewport: Viewport) -> Placement {
        let flipped = trigger.bottom() + menu.height > viewport.height;
        let top = if flipped {
            (trigger.top - menu.height).max(0.0)
        } else {
            trigger.bottom()
        };

        let limit = viewport.width - self.margin;
        let mut left = trigger.left;
        if left + menu.width > limit {
            left = limit - menu.width;
        }
        let left = left.max(self.margin);

        Placement { top, left, flipped }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    AddChild,
    Rename,
    Duplicate,
    CopyLink,
    Share,
    TogglePublic,
    MoveToTemplates,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Input the open menu reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuEvent {
    PointerDown { x: f32, y: f32 },
    KeyDown(Key),
    Action(MenuAction),
    /// The sidebar scrolled; the trigger moved.
    Scroll { trigger: Rect },
    Resize { trigger: Rect, viewport: Viewport },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    OutsidePointer,
    Escape,
    Action(MenuAction),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuUpdate {
    Unchanged,
    Moved(Placement),
    Closed(CloseReason),
}

/// An open action menu anchored to one node's trigger.
#[derive(Debug, Clone)]
pub struct ActionMenu {
    node: NodeId,
    trigger: Rect,
    size: MenuSize,
    viewport: Viewport,
    placement: Placement,
    positioner: MenuPositioner,
}

impl ActionMenu {
    pub fn open(
        node: NodeId,
        trigger: Rect,
        size: MenuSize,
        viewport: Viewport,
        positioner: MenuPositioner,
    ) -> Self {
        let placement = positioner.place(trigger, size, viewport);
        debug!(node_id = %node, top = placement.top, left = placement.left, "Action menu opened");
        Self {
            node,
            trigger,
            size,
            viewport,
            placement,
            positioner,
        }
    }

    pub fn node(&self) -> &NodeId {
        &self.node
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn bounds(&self) -> Rect {
        self.placement.rect(self.size)
    }

    /// Feed one event. A `Closed` result means the caller should drop the menu.
    pub fn handle(&mut self, event: MenuEvent) -> MenuUpdate {
        match event {
            MenuEvent::PointerDown { x, y } => {
                if self.bounds().contains(x, y) || self.trigger.contains(x, y) {
                    MenuUpdate::Unchanged
                } else {
                    MenuUpdate::Closed(CloseReason::OutsidePointer)
                }
            }
            MenuEvent::KeyDown(Key::Escape) => MenuUpdate::Closed(CloseReason::Escape),
            MenuEvent::KeyDown(Key::Other) => MenuUpdate::Unchanged,
            MenuEvent::Action(action) => {
                debug!(node_id = %self.node, action = ?action, "Menu action invoked");
                MenuUpdate::Closed(CloseReason::Action(action))
            }
            MenuEvent::Scroll { trigger } => self.reposition(trigger, self.viewport),
            MenuEvent::Resize { trigger, viewport } => self.reposition(trigger, viewport),
        }
    }

    fn reposition(&mut self, trigger: Rect, viewport: Viewport) -> MenuUpdate {
        self.trigger = trigger;
        self.viewport = viewport;
        let next = self.positioner.place(trigger, self.size, viewport);
        if next == self.placement {
            return MenuUpdate::Unchanged;
        }
        self.placement = next;
        MenuUpdate::Moved(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };
    const MENU: MenuSize = MenuSize {
        width: 240.0,
        height: 200.0,
    };

    fn inside(rect: Rect, viewport: Viewport) -> bool {
        rect.left >= 0.0
            && rect.top >= 0.0
            && rect.right() <= viewport.width
            && rect.bottom() <= viewport.height
    }

    #[test]
    fn defaults_below_trigger() {
        let p = MenuPositioner::default().place(Rect::new(100.0, 100.0, 24.0, 24.0), MENU, VIEW);
        assert_eq!(p, Placement { top: 124.0, left: 100.0, flipped: false });
    }

    #[test]
    fn bottom_right_corner_flips_and_shifts() {
        let trigger = Rect::new(900.0, 700.0, 24.0, 24.0);
        let p = MenuPositioner::default().place(trigger, MENU, VIEW);
        assert!(p.flipped);
        assert_eq!(p.top, 500.0);
        assert_eq!(p.left, 1000.0 - 8.0 - 240.0);
        assert!(inside(p.rect(MENU), VIEW));
    }

    #[test]
    fn narrow_viewport_clamps_to_margin() {
        let viewport = Viewport { width: 200.0, height: 800.0 };
        let p = MenuPositioner::default().place(Rect::new(150.0, 10.0, 24.0, 24.0), MENU, viewport);
        assert_eq!(p.left, 8.0);
    }

    #[test]
    fn closes_on_outside_pointer_escape_and_action() {
        let open = || {
            ActionMenu::open(
                NodeId::new("n"),
                Rect::new(100.0, 100.0, 24.0, 24.0),
                MENU,
                VIEW,
                MenuPositioner::default(),
            )
        };
        let mut menu = open();
        assert_eq!(menu.handle(MenuEvent::PointerDown { x: 150.0, y: 200.0 }), MenuUpdate::Unchanged);
        assert_eq!(menu.handle(MenuEvent::PointerDown { x: 110.0, y: 110.0 }), MenuUpdate::Unchanged);
        assert_eq!(
            menu.handle(MenuEvent::PointerDown { x: 700.0, y: 700.0 }),
            MenuUpdate::Closed(CloseReason::OutsidePointer)
        );
        assert_eq!(
            open().handle(MenuEvent::KeyDown(Key::Escape)),
            MenuUpdate::Closed(CloseReason::Escape)
        );
        assert_eq!(open().handle(MenuEvent::KeyDown(Key::Other)), MenuUpdate::Unchanged);
        assert_eq!(
            open().handle(MenuEvent::Action(MenuAction::Delete)),
            MenuUpdate::Closed(CloseReason::Action(MenuAction::Delete))
        );
    }

    #[test]
    fn tracks_trigger_on_scroll() {
        let mut menu = ActionMenu::open(
            NodeId::new("n"),
            Rect::new(100.0, 100.0, 24.0, 24.0),
            MENU,
            VIEW,
            MenuPositioner::default(),
        );
        let update = menu.handle(MenuEvent::Scroll {
            trigger: Rect::new(100.0, 60.0, 24.0, 24.0),
        });
        assert_eq!(update, MenuUpdate::Moved(Placement { top: 84.0, left: 100.0, flipped: false }));
        assert_eq!(
            menu.handle(MenuEvent::Scroll { trigger: Rect::new(100.0, 60.0, 24.0, 24.0) }),
            MenuUpdate::Unchanged
        );
        let update = menu.handle(MenuEvent::Resize {
            trigger: Rect::new(100.0, 60.0, 24.0, 24.0),
            viewport: Viewport { width: 1000.0, height: 200.0 },
        });
        assert!(matches!(update, MenuUpdate::Moved(p) if p.flipped));
    }
}

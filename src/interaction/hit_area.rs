//! Hit area tracking for a single interactive element.
//!
//! The owner updates the rect every time the element is rendered and feeds
//! every mouse event through [`HitAreaBinding::translate`] (or
//! [`HitAreaBinding::dispatch`] to drive a controller directly).

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::trace;

use crate::controller::InteractionController;
use crate::events::InteractionEvent;
use crate::traits::Clock;

/// A rectangular region that responds to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitArea {
    pub rect: Rect,
}

impl HitArea {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// Check if a point is within this hit area.
    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.rect.x
            && x < self.rect.x.saturating_add(self.rect.width)
            && y >= self.rect.y
            && y < self.rect.y.saturating_add(self.rect.height)
    }
}

/// Output of translating one mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingEvent {
    /// An event for the bound element
    Element(InteractionEvent),
    /// A left click outside the element (tap-elsewhere dismissal)
    Outside,
}

/// Tracks whether the pointer is inside one element.
#[derive(Debug, Default)]
pub struct HitAreaBinding {
    area: HitArea,
    /// Last pointer position seen
    last_position: Option<(u16, u16)>,
    inside: bool,
}

impl HitAreaBinding {
    pub fn new(rect: Rect) -> Self {
        Self {
            area: HitArea::new(rect),
            last_position: None,
            inside: false,
        }
    }

    pub fn area(&self) -> HitArea {
        self.area
    }

    /// Whether the pointer was last seen inside the element.
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Move the element after a re-layout.
    ///
    /// Returns a crossing event if the last known pointer position is now on
    /// the other side of the element boundary.
    pub fn set_rect(&mut self, rect: Rect) -> Option<InteractionEvent> {
        self.area = HitArea::new(rect);
        let (x, y) = self.last_position?;
        self.update_inside(self.area.contains(x, y))
    }

    /// Translate a crossterm mouse event.
    ///
    /// Produces at most two events (a crossing followed by a click).
    pub fn translate(&mut self, event: &MouseEvent) -> Vec<BindingEvent> {
        let (x, y) = (event.column, event.row);
        self.last_position = Some((x, y));
        let hit = self.area.contains(x, y);

        let mut out = Vec::with_capacity(2);
        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                out.extend(self.update_inside(hit).map(BindingEvent::Element));
            }
            MouseEventKind::Down(MouseButton::Left) => {
                // Terminals without motion reporting deliver a click with no
                // preceding move, so a crossing may come first
                out.extend(self.update_inside(hit).map(BindingEvent::Element));
                out.push(if hit {
                    BindingEvent::Element(InteractionEvent::Click)
                } else {
                    BindingEvent::Outside
                });
            }
            _ => {}
        }
        out
    }

    /// Translate a mouse event and apply it to `controller`.
    ///
    /// A click outside the element dismisses the overlay. Returns true if the
    /// controller's open state changed.
    pub fn dispatch<C: Clock>(
        &mut self,
        event: &MouseEvent,
        controller: &mut InteractionController<C>,
    ) -> bool {
        let was_open = controller.is_open();
        for binding_event in self.translate(event) {
            match binding_event {
                BindingEvent::Element(e) => controller.handle(e),
                BindingEvent::Outside => {
                    if controller.is_open() {
                        trace!("Click outside element, dismissing overlay");
                        controller.set_open(false);
                    }
                }
            }
        }
        controller.is_open() != was_open
    }

    fn update_inside(&mut self, hit: bool) -> Option<InteractionEvent> {
        if hit == self.inside {
            return None;
        }
        self.inside = hit;
        Some(if hit {
            InteractionEvent::PointerEnter
        } else {
            InteractionEvent::PointerLeave
        })
    }
}

//! Input events understood by the interaction controller.

/// One event from the element the controller is bound to.
///
/// Each variant maps 1:1 to a controller handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    PointerEnter,
    PointerLeave,
    TouchStart,
    TouchEnd,
    Click,
}

impl InteractionEvent {
    /// Handler name as seen by DOM-like hosts.
    pub fn handler_name(self) -> &'static str {
        match self {
            InteractionEvent::PointerEnter => "onPointerEnter",
            InteractionEvent::PointerLeave => "onPointerLeave",
            InteractionEvent::TouchStart => "onTouchStart",
            InteractionEvent::TouchEnd => "onTouchEnd",
            InteractionEvent::Click => "onClick",
        }
    }
}

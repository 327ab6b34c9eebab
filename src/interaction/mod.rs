//! Binding the controller to a terminal element.
//!
//! Terminals report raw mouse positions rather than per-element enter and
//! leave events. [`HitAreaBinding`] hit-tests crossterm mouse events against
//! the element's last rendered [`Rect`](ratatui::layout::Rect) and turns
//! boundary crossings and clicks into [`InteractionEvent`](crate::events::InteractionEvent)s.

pub mod hit_area;

pub use hit_area::{BindingEvent, HitArea, HitAreaBinding};

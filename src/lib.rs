//! Hoverlay - cross-device open/close control for tooltip-like overlays
//!
//! An [`InteractionController`](controller::InteractionController) decides
//! whether the overlay of one interactive element is shown, reconciling
//! debounced hover with instant touch and click. Rendering the overlay is
//! left to the owner, which reads `is_open()` every frame.

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod events;
pub mod interaction;
pub mod timer;
pub mod traits;

pub use config::{InteractionConfig, TriggerMode};
pub use controller::InteractionController;
pub use error::ConfigError;
pub use events::InteractionEvent;

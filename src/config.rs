//! Controller configuration.
//!
//! Configuration is total: every value the host can hand us maps onto a
//! usable config. Strict loaders exist for callers that want to surface a
//! malformed document, but the `*_or_default` variants never fail and fall
//! back field by field.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default hover debounce before the overlay appears.
pub const DEFAULT_DELAY_MS: u64 = 200;

/// Default window after a touch-open in which the tap's own click is
/// ignored. Zero: every click toggles.
pub const DEFAULT_TOUCH_CLICK_WINDOW_MS: u64 = 0;

/// Which input modalities may open the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Pointer enter/leave only
    Hover,
    /// Touch and click only
    Click,
    /// Every modality
    #[default]
    Both,
}

impl TriggerMode {
    /// Whether pointer enter/leave events are honored.
    pub fn allows_hover(self) -> bool {
        matches!(self, TriggerMode::Hover | TriggerMode::Both)
    }

    /// Whether touch start and click events are honored.
    pub fn allows_click(self) -> bool {
        matches!(self, TriggerMode::Click | TriggerMode::Both)
    }
}

impl FromStr for TriggerMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hover" => Ok(TriggerMode::Hover),
            "click" => Ok(TriggerMode::Click),
            "both" => Ok(TriggerMode::Both),
            _ => Err(()),
        }
    }
}

/// Immutable settings supplied when a controller is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionConfig {
    /// Hover debounce in milliseconds
    pub delay_ms: u64,
    /// Suppresses every open request (closes still succeed)
    pub disabled: bool,
    /// Honored input modalities
    pub trigger_mode: TriggerMode,
    /// Window in which a click following a touch-open is treated as the
    /// same tap. Zero turns suppression off.
    pub touch_click_window_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            disabled: false,
            trigger_mode: TriggerMode::default(),
            touch_click_window_ms: DEFAULT_TOUCH_CLICK_WINDOW_MS,
        }
    }
}

impl InteractionConfig {
    /// Create a config with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hover delay. Negative values are clamped to zero.
    pub fn with_delay_ms(mut self, delay_ms: i64) -> Self {
        self.delay_ms = delay_ms.max(0) as u64;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_trigger_mode(mut self, trigger_mode: TriggerMode) -> Self {
        self.trigger_mode = trigger_mode;
        self
    }

    /// Set the tap window. Negative values are clamped to zero.
    pub fn with_touch_click_window_ms(mut self, window_ms: i64) -> Self {
        self.touch_click_window_ms = window_ms.max(0) as u64;
        self
    }

    /// Hover delay as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Tap window as a [`Duration`].
    pub fn touch_click_window(&self) -> Duration {
        Duration::from_millis(self.touch_click_window_ms)
    }

    /// Parse a JSON document.
    ///
    /// Only a syntactically malformed document (or one whose fields have the
    /// wrong JSON type) is an error. Out-of-range values are clamped and
    /// unknown trigger modes fall back to [`TriggerMode::Both`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Ok(raw.resolve())
    }

    /// Parse a JSON document, falling back to defaults if it is malformed.
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Invalid interaction config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Load a JSON config file, falling back to defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Could not load interaction config, using defaults: {}", e);
                Self::default()
            }
        }
    }
}

/// Wire shape of the config. Every field is optional and loosely typed so
/// that resolution can clamp instead of rejecting.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    delay_ms: Option<f64>,
    disabled: Option<bool>,
    trigger_mode: Option<String>,
    touch_click_window_ms: Option<f64>,
}

impl RawConfig {
    fn resolve(self) -> InteractionConfig {
        let defaults = InteractionConfig::default();

        let trigger_mode = match self.trigger_mode.as_deref() {
            None => defaults.trigger_mode,
            Some(s) => s.parse().unwrap_or_else(|_| {
                tracing::warn!("Unknown trigger mode {:?}, using {:?}", s, defaults.trigger_mode);
                defaults.trigger_mode
            }),
        };

        InteractionConfig {
            delay_ms: self
                .delay_ms
                .map(|ms| clamp_millis("delay_ms", ms))
                .unwrap_or(defaults.delay_ms),
            disabled: self.disabled.unwrap_or(defaults.disabled),
            trigger_mode,
            touch_click_window_ms: self
                .touch_click_window_ms
                .map(|ms| clamp_millis("touch_click_window_ms", ms))
                .unwrap_or(defaults.touch_click_window_ms),
        }
    }
}

/// Clamp a loosely typed millisecond value to a non-negative integer.
fn clamp_millis(field: &str, ms: f64) -> u64 {
    if ms.is_nan() || ms < 0.0 {
        tracing::warn!("{} = {} is out of range, clamping to 0", field, ms);
        return 0;
    }
    // `as` saturates for values above u64::MAX
    ms as u64
}

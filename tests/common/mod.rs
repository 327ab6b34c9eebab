//! Common test utilities for integration tests.
//!
//! Provides controllers wired to a [`ManualClock`] so timing scenarios run
//! deterministically.

use std::sync::Once;

use hoverlay::config::InteractionConfig;
use hoverlay::controller::InteractionController;
use hoverlay::traits::ManualClock;

static TRACING: Once = Once::new();

/// Route controller logs to the test writer. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A controller plus the clock that drives it.
pub struct Harness {
    pub controller: InteractionController<ManualClock>,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new(config: InteractionConfig) -> Self {
        init_tracing();
        let clock = ManualClock::new();
        let controller = InteractionController::with_clock(config, clock.clone());
        Self { controller, clock }
    }

    /// Advance time and let a due delayed open fire.
    pub fn wait_ms(&mut self, ms: u64) {
        self.clock.advance_ms(ms);
        self.controller.poll();
    }
}

/// Defaults used by the reference scenarios: both modalities, 200ms delay.
pub fn scenario_config() -> InteractionConfig {
    InteractionConfig::default().with_delay_ms(200)
}

//! Async driver for an interaction controller.
//!
//! Runs one [`InteractionController`] on a tokio task. The owner sends
//! commands over an unbounded channel and observes the open state through a
//! `watch` channel. The task sleeps until the pending delayed open is due, so
//! the deadline lives on the runtime's timer while the controller keeps its
//! plain single-owner state.
//!
//! # Example
//!
//! ```no_run
//! use hoverlay::config::InteractionConfig;
//! use hoverlay::driver;
//! use hoverlay::events::InteractionEvent;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tokio::sync::watch::error::RecvError> {
//!     let (handle, _task) = driver::spawn(InteractionConfig::default());
//!     let mut open_rx = handle.subscribe();
//!
//!     handle.send(InteractionEvent::PointerEnter);
//!     open_rx.changed().await?;
//!     assert!(*open_rx.borrow());
//!     Ok(())
//! }
//! ```

use std::time::Instant;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::InteractionConfig;
use crate::controller::InteractionController;
use crate::events::InteractionEvent;
use crate::traits::TokioClock;

/// Commands accepted by the driver task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward an input event to the controller
    Event(InteractionEvent),
    /// Owner override of the open state
    SetOpen(bool),
    /// Toggle the disabled flag
    SetDisabled(bool),
    /// Cancel pending work and stop the task
    Teardown,
}

/// Owner-side handle to a running driver.
///
/// Cloning gives another handle to the same controller. The task stops on
/// [`ControllerHandle::teardown`] or once every handle is dropped.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    command_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<bool>,
}

impl ControllerHandle {
    /// Forward an input event.
    pub fn send(&self, event: InteractionEvent) {
        self.command(Command::Event(event));
    }

    /// Force the open state (e.g. dismissal on a tap elsewhere).
    pub fn set_open(&self, value: bool) {
        self.command(Command::SetOpen(value));
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.command(Command::SetDisabled(disabled));
    }

    /// Cancel any pending open and stop the driver.
    pub fn teardown(&self) {
        self.command(Command::Teardown);
    }

    /// Last published open state.
    pub fn is_open(&self) -> bool {
        *self.state_rx.borrow()
    }

    /// Subscribe to open state changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state_rx.clone()
    }

    /// Whether the driver task is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.command_tx.is_closed()
    }

    fn command(&self, command: Command) {
        if self.command_tx.send(command).is_err() {
            warn!("Interaction driver has stopped, dropping {:?}", command);
        }
    }
}

/// Spawn a driver task on the current tokio runtime.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn(config: InteractionConfig) -> (ControllerHandle, JoinHandle<()>) {
    let controller = InteractionController::with_clock(config, TokioClock);
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(controller.is_open());

    let task = tokio::spawn(run_controller(controller, command_rx, state_tx));

    (
        ControllerHandle {
            command_tx,
            state_rx,
        },
        task,
    )
}

/// Main driver loop: apply commands in order and fire the delayed open when
/// its deadline passes.
async fn run_controller(
    mut controller: InteractionController<TokioClock>,
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<bool>,
) {
    loop {
        let deadline = controller.next_deadline();

        tokio::select! {
            command = command_rx.recv() => {
                match command {
                    Some(Command::Event(event)) => controller.handle(event),
                    Some(Command::SetOpen(value)) => controller.set_open(value),
                    Some(Command::SetDisabled(disabled)) => controller.set_disabled(disabled),
                    Some(Command::Teardown) => {
                        debug!("Teardown requested, stopping interaction driver");
                        break;
                    }
                    None => {
                        debug!("All controller handles dropped, stopping interaction driver");
                        break;
                    }
                }
            }
            _ = sleep_until(deadline) => {
                controller.poll();
            }
        }

        if controller.take_redraw() {
            let open = controller.is_open();
            state_tx.send_if_modified(|current| {
                if *current == open {
                    return false;
                }
                *current = open;
                true
            });
        }
    }

    controller.teardown();
    command_rx.close();
}

/// Sleep until `deadline`, or forever if there is none.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending::<()>().await,
    }
}

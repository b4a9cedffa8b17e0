use crate::command::CommandError;
use mockall::automock;
use std::path::Path;
use thiserror::Error;

/// The duct-based implementation of the supervisor.
pub mod process;

/// A custom error describing the error cases for starting the application.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The start command could not be parsed into a program and arguments.
    #[error("cannot use the start command: {0}")]
    InvalidStartCommand(#[from] CommandError),
    /// The underlying Rust command creation failed. The parameter contains the error.
    #[error("the application cannot start: {0}")]
    SpawnFailure(#[from] std::io::Error),
    /// An application process is already registered.
    #[error("an application is already running")]
    AlreadyRunning,
}

/// A custom error for a termination signal that was not delivered.
///
/// This is only ever logged as a warning: the registration is cleared whether
/// or not the signal went through, so a stuck process can never block a reset.
#[derive(Debug, Error)]
pub enum ProcessSignalError {
    /// The OS rejected the termination signal.
    #[cfg(unix)]
    #[error("termination signal rejected: {0}")]
    SignalRejected(#[from] nix::Error),
    /// The process could not be killed or awaited.
    #[error("could not kill the application: {0}")]
    KillFailure(#[from] std::io::Error),
}

/// A supervisor owns the lifecycle of the single application process.
///
/// At most one process is registered at a time, and nothing else in the
/// program may signal it directly.
#[automock]
pub trait Supervisor {
    /// Whether an application process is registered and has not exited on
    /// its own. A process that exited by itself is unregistered here, so the
    /// next scan starts a fresh one.
    fn is_running(&mut self) -> bool;

    /// Split the start command and spawn it with the checkout as working
    /// directory, registering the handle. Fails if a process is already
    /// registered.
    fn start(&mut self, checkout: &Path, start_command: &str) -> Result<(), SupervisorError>;

    /// Stop the registered process, if any. Stopping is best-effort: the
    /// outcome of the termination signal is logged and the registration is
    /// cleared regardless.
    fn stop(&mut self);
}

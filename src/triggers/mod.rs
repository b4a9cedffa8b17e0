use mockall::automock;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// A trigger that requests a scan on every HTTP request.
pub mod http;
/// A trigger that requests a single scan and then exits.
pub mod once;
/// A trigger that requests scans periodically.
pub mod schedule;
/// A trigger that shuts the program down on a termination signal.
pub mod signal;

/// A custom error for describing the error cases for triggers.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Cannot initialize the trigger, because it has a misconfiguration.
    #[error("not configured correctly: {0}")]
    Misconfigured(String),
    /// Cannot send the trigger message. This is usually because the receiver hung up.
    #[error("cannot request a scan, receiver hung up")]
    ReceiverHangup(#[from] std::sync::mpsc::SendError<Option<()>>),
    /// The trigger could not answer an HTTP request.
    #[error("cannot respond to a request: {0}")]
    FailedResponse(#[from] std::io::Error),
}

/// A trigger is a long running background process which initiates
/// reconciliation scans.
///
/// A `Some(())` message requests one scan; a `None` message asks the main
/// loop to shut down.
#[automock]
pub trait Trigger: Sync + Send {
    /// Start the trigger process.
    fn listen(&self, tx: Sender<Option<()>>) -> Result<(), TriggerError>;
}

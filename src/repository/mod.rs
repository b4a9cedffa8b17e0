use crate::command::CommandError;
use mockall::automock;
use std::path::PathBuf;
use thiserror::Error;

/// The git implementation of the repository manager.
pub mod git;

/// A custom error describing a failed clone.
///
/// A failed clone is terminal for the current reconciliation cycle: it leaves
/// neither a checkout nor a running process behind, and the next cycle retries
/// from the "no checkout" branch.
#[derive(Debug, Error)]
pub enum CloneError {
    /// The clone command failed. The wrapped error carries the raw output.
    #[error("git clone failed: {0}")]
    CloneFailed(#[from] CommandError),
}

/// The repository manager owns the on-disk checkout.
///
/// The checkout is either absent or a git working tree cloned from the
/// tracked repository; everything that touches the directory goes through
/// this trait.
#[automock]
pub trait Repository {
    /// Whether the checkout directory exists on disk.
    fn exists(&self) -> bool;

    /// The path of the checkout directory.
    fn checkout_path(&self) -> PathBuf;

    /// Delete the checkout recursively. Deletion is best-effort: failures are
    /// logged and leftover files are tolerated, because the following clone
    /// then fails loudly instead.
    fn remove(&self);

    /// Clone the tracked repository into the checkout directory.
    fn clone_repository(&self) -> Result<(), CloneError>;

    /// The URL the checkout's `origin` remote is configured with.
    fn origin_url(&self) -> Result<String, CommandError>;
}

use crate::command::CommandError;
use mockall::automock;

/// The `git describe` implementation of the version probe.
pub mod describe;

/// A version probe compares the checkout against its remote to decide whether
/// it is stale.
///
/// Version descriptors are opaque tokens: they are never parsed, only compared
/// for equality.
#[automock]
pub trait VersionProbe {
    /// The version descriptor of the remote-tracking branch.
    fn remote_version(&self) -> Result<String, CommandError>;

    /// The version descriptor of the local branch.
    fn local_version(&self) -> Result<String, CommandError>;

    /// Whether the local checkout matches the remote. Any error on either
    /// side counts as a non-match, so an unreadable version can never keep
    /// stale code running.
    fn matches(&self) -> bool;
}

use super::VersionProbe;
use crate::command::{self, CommandError};
use log::{info, warn};
use std::path::PathBuf;

/// A version probe built on `git describe`.
///
/// A descriptor is the nearest reachable `v*` tag, the commit distance and the
/// abbreviated commit hash (e.g. `v1.2-3-gabc1234`); with no matching tag it
/// falls back to the bare hash. The local branch and its remote-tracking
/// branch are on the same version iff their descriptors are equal strings.
pub struct DescribeProbe {
    checkout: PathBuf,
    branch: String,
}

impl DescribeProbe {
    /// Probe the given checkout on the given branch.
    pub fn new(checkout: PathBuf, branch: String) -> Self {
        DescribeProbe { checkout, branch }
    }

    fn describe(&self, reference: &str) -> Result<String, CommandError> {
        command::git_query(
            &[
                "describe",
                "--abbrev=7",
                "--always",
                "--long",
                "--match",
                "v*",
                reference,
            ],
            &self.checkout,
        )
    }

    /// Refresh the remote-tracking refs. A failure only means the comparison
    /// runs against stale refs and a reset may be missed this cycle, so it is
    /// logged and swallowed instead of propagated.
    fn update_remote(&self) {
        if let Err(err) = command::git_command(&["remote", "update"], &self.checkout) {
            warn!("Could not refresh the remote refs: {err}.");
        }
    }
}

impl VersionProbe for DescribeProbe {
    fn remote_version(&self) -> Result<String, CommandError> {
        self.update_remote();
        self.describe(&format!("origin/{}", self.branch))
    }

    fn local_version(&self) -> Result<String, CommandError> {
        self.describe(&self.branch)
    }

    fn matches(&self) -> bool {
        let remote = self.remote_version();
        let local = self.local_version();

        match (remote, local) {
            (Ok(remote), Ok(local)) => {
                info!("Versions | Remote: {remote} - Local: {local}");
                remote == local
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!("Could not determine versions ({err}), treating the checkout as stale.");
                false
            }
        }
    }
}

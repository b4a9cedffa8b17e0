use crate::repository::Repository;
use log::{debug, warn};

/// A guard against the checkout pointing at a different repository than the
/// tracked one, e.g. after the configuration changed between two runs.
pub struct OriginGuard {
    url: String,
}

impl OriginGuard {
    /// Expect the given canonical repository URL as the checkout's origin.
    pub fn new(url: String) -> Self {
        OriginGuard { url }
    }

    /// Compare the checkout's `origin` remote against the tracked repository.
    ///
    /// Never fails: a failing query downgrades to a mismatch, because a
    /// checkout we cannot identify is better re-cloned than trusted.
    pub fn matches(&self, repository: &impl Repository) -> bool {
        match repository.origin_url() {
            Ok(origin) if origin == self.url => {
                debug!("Origin matches the tracked repository.");
                true
            }
            Ok(origin) => {
                warn!(
                    "Origin {origin} does not match the tracked repository {}.",
                    self.url
                );
                false
            }
            Err(err) => {
                warn!("Could not read the origin URL ({err}), treating it as a mismatch.");
                false
            }
        }
    }
}

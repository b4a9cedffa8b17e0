use super::{CloneError, Repository};
use crate::command::{self, CommandError};
use log::{debug, info, warn};
use std::{fs, path::PathBuf};

/// Name of the checkout directory under the root.
pub const CHECKOUT_DIR: &str = "repo";

/// The on-disk checkout of the tracked repository.
///
/// The checkout always lives in the `repo/` subdirectory of the root, so a
/// reset can wipe and re-create it without touching anything else.
pub struct GitRepository {
    root: PathBuf,
    url: String,
}

impl GitRepository {
    /// Manage the checkout under the given root directory, cloning from the
    /// given URL.
    pub fn new(root: impl Into<PathBuf>, url: String) -> Self {
        GitRepository {
            root: root.into(),
            url,
        }
    }
}

impl Repository for GitRepository {
    fn exists(&self) -> bool {
        self.checkout_path().exists()
    }

    fn checkout_path(&self) -> PathBuf {
        self.root.join(CHECKOUT_DIR)
    }

    fn remove(&self) {
        let checkout = self.checkout_path();
        if !checkout.exists() {
            return;
        }

        info!("Stale checkout present, deleting...");
        match fs::remove_dir_all(&checkout) {
            Ok(()) => debug!("Removed checkout {}.", checkout.display()),
            // Leftover files make the following clone fail loudly.
            Err(err) => warn!("Could not remove checkout {}: {err}.", checkout.display()),
        }
    }

    fn clone_repository(&self) -> Result<(), CloneError> {
        command::git_command(&["clone", &self.url, CHECKOUT_DIR], &self.root)?;
        Ok(())
    }

    fn origin_url(&self) -> Result<String, CommandError> {
        command::git_query(&["remote", "get-url", "origin"], &self.checkout_path())
    }
}

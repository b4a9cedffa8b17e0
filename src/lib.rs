//! Keep a deployed application tethered to the `HEAD` of its git repository.
//!
//! ## How it works
//!
//! `tether` tracks one branch of one GitHub repository in a local checkout and
//! supervises the single process started from it. **Triggers** are long running
//! background processes that initiate reconciliation **scans** (periodically,
//! on an HTTP request or once). A scan decides whether the checkout is still
//! the right one (its `origin` remote unchanged) and still current (equal
//! `git describe` descriptors between the local branch and its remote-tracking
//! branch); on any doubt it resets: stop the application, wipe the checkout,
//! clone it fresh and start the application again.
//!
//! ```ignore
//! +---------+       +------------+       +--------------------------+
//! | trigger | ----> | reconciler | ----> | stop, wipe, clone, start |
//! +---------+       +------------+       +--------------------------+
//! ```

/// Parsing and running of external `git` commands.
pub mod command;
/// Validated configuration: repository URL, branch and start command.
pub mod config;
/// A guard comparing the checkout's `origin` against the tracked repository.
pub mod origin;
/// The scan/reset decision procedure, the core of the program.
pub mod reconciler;
/// The on-disk checkout: existence, deletion, cloning and origin queries.
pub mod repository;
/// The main program loop, that runs the triggers and scans on every message.
pub mod start;
/// The lifecycle of the single supervised application process.
pub mod supervisor;
/// Triggers initiating reconciliation scans (e.g. [on a schedule](triggers::schedule::ScheduleTrigger),
/// [on HTTP request](triggers::http::HttpTrigger) or [once](triggers::once::OnceTrigger)).
pub mod triggers;
/// Version probing, comparing `git describe` descriptors.
pub mod version;

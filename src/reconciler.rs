use crate::{
    config::Config,
    origin::OriginGuard,
    repository::{CloneError, Repository},
    supervisor::Supervisor,
    version::VersionProbe,
};
use log::{debug, error, info};

/// The decision procedure that keeps the checkout and the supervised
/// application consistent with the remote repository.
///
/// One [`scan`](Reconciler::scan) is one reconciliation cycle: decide whether
/// the checkout is still the right one and still current, reset it if not,
/// and make sure the application is running afterwards. Scans are driven
/// sequentially from a single loop, so a cycle never overlaps itself.
pub struct Reconciler<R: Repository, P: VersionProbe, S: Supervisor> {
    config: Config,
    repository: R,
    origin: OriginGuard,
    probe: P,
    supervisor: S,
}

impl<R, P, S> Reconciler<R, P, S>
where
    R: Repository,
    P: VersionProbe,
    S: Supervisor,
{
    /// Create a reconciler over validated configuration and the parts it
    /// orchestrates.
    pub fn new(config: Config, repository: R, probe: P, supervisor: S) -> Self {
        let origin = OriginGuard::new(config.repository_url.clone());

        Reconciler {
            config,
            repository,
            origin,
            probe,
            supervisor,
        }
    }

    /// Run one reconciliation cycle.
    ///
    /// Never fails: a cycle that cannot make progress is logged and retried
    /// on the next trigger. The returned string is a human-readable summary;
    /// callers key off the logs and side effects.
    pub fn scan(&mut self) -> String {
        let checkout = if !self.repository.exists() {
            info!("No checkout present.");
            self.reset()
        } else if !self.origin.matches(&self.repository) {
            self.reset()
        } else if !self.probe.matches() {
            info!("Checkout is behind the remote.");
            self.reset()
        } else {
            debug!("Checkout is up to date.");
            Ok(())
        };

        match checkout {
            Ok(()) => {
                self.ensure_running();
                String::from("Scan complete.")
            }
            Err(err) => {
                error!("Could not clone the repository: {err}.");
                String::from("Scan aborted, retrying on the next cycle.")
            }
        }
    }

    /// Stop the supervised application; called when the program shuts down.
    pub fn shutdown(&mut self) {
        self.supervisor.stop();
    }

    /// Tear the checkout down and clone it fresh.
    ///
    /// The application is stopped first so nothing keeps running out of a
    /// deleted directory. A failed clone leaves neither a checkout nor a
    /// process behind, and the next scan starts over from the "no checkout"
    /// branch.
    fn reset(&mut self) -> Result<(), CloneError> {
        if self.supervisor.is_running() {
            self.supervisor.stop();
        }

        self.repository.remove();

        info!("Cloning up-to-date repository...");
        self.repository.clone_repository()?;
        info!("Repository cloned successfully.");

        Ok(())
    }

    fn ensure_running(&mut self) {
        if self.supervisor.is_running() {
            return;
        }

        info!("Starting application: {}.", self.config.start_command);
        let checkout = self.repository.checkout_path();
        if let Err(err) = self.supervisor.start(&checkout, &self.config.start_command) {
            error!("Could not start the application: {err}.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        command::CommandError,
        repository::MockRepository,
        supervisor::MockSupervisor,
        version::MockVersionProbe,
    };
    use std::path::{Path, PathBuf};

    const URL: &str = "https://github.com/acme/app";

    fn test_config() -> Config {
        Config::new(Some(URL), "main", Some("node server.js")).unwrap()
    }

    fn expect_start(supervisor: &mut MockSupervisor) {
        supervisor
            .expect_start()
            .times(1)
            .withf(|checkout, start_command| {
                checkout == Path::new("repo") && start_command == "node server.js"
            })
            .returning(|_, _| Ok(()));
    }

    #[test]
    fn it_should_clone_and_start_when_the_checkout_is_missing() {
        let mut repository = MockRepository::new();
        repository.expect_exists().times(1).returning(|| false);
        repository.expect_remove().times(1).return_const(());
        repository
            .expect_clone_repository()
            .times(1)
            .returning(|| Ok(()));
        repository
            .expect_checkout_path()
            .return_const(PathBuf::from("repo"));

        let probe = MockVersionProbe::new();

        let mut supervisor = MockSupervisor::new();
        supervisor.expect_is_running().times(2).returning(|| false);
        supervisor.expect_stop().times(0);
        expect_start(&mut supervisor);

        let mut reconciler = Reconciler::new(test_config(), repository, probe, supervisor);
        reconciler.scan();
    }

    #[test]
    fn it_should_reset_when_the_origin_differs() {
        let mut repository = MockRepository::new();
        repository.expect_exists().times(1).returning(|| true);
        repository
            .expect_origin_url()
            .times(1)
            .returning(|| Ok(String::from("https://github.com/other/app")));
        repository.expect_remove().times(1).return_const(());
        repository
            .expect_clone_repository()
            .times(1)
            .returning(|| Ok(()));
        repository
            .expect_checkout_path()
            .return_const(PathBuf::from("repo"));

        // The version probe is never consulted: the origin mismatch alone
        // forces the reset.
        let probe = MockVersionProbe::new();

        let mut supervisor = MockSupervisor::new();
        let mut calls = 0;
        supervisor.expect_is_running().times(2).returning_st(move || {
            calls += 1;
            calls == 1
        });
        supervisor.expect_stop().times(1).return_const(());
        expect_start(&mut supervisor);

        let mut reconciler = Reconciler::new(test_config(), repository, probe, supervisor);
        reconciler.scan();
    }

    #[test]
    fn it_should_reset_when_the_versions_differ() {
        let mut repository = MockRepository::new();
        repository.expect_exists().times(1).returning(|| true);
        repository
            .expect_origin_url()
            .times(1)
            .returning(|| Ok(String::from(URL)));
        repository.expect_remove().times(1).return_const(());
        repository
            .expect_clone_repository()
            .times(1)
            .returning(|| Ok(()));
        repository
            .expect_checkout_path()
            .return_const(PathBuf::from("repo"));

        let mut probe = MockVersionProbe::new();
        probe.expect_matches().times(1).returning(|| false);

        let mut supervisor = MockSupervisor::new();
        let mut calls = 0;
        supervisor.expect_is_running().times(2).returning_st(move || {
            calls += 1;
            calls == 1
        });
        supervisor.expect_stop().times(1).return_const(());
        expect_start(&mut supervisor);

        let mut reconciler = Reconciler::new(test_config(), repository, probe, supervisor);
        reconciler.scan();
    }

    #[test]
    fn it_should_do_nothing_when_the_checkout_is_current_and_the_app_runs() {
        let mut repository = MockRepository::new();
        repository.expect_exists().times(1).returning(|| true);
        repository
            .expect_origin_url()
            .times(1)
            .returning(|| Ok(String::from(URL)));
        repository.expect_remove().times(0);
        repository.expect_clone_repository().times(0);

        let mut probe = MockVersionProbe::new();
        probe.expect_matches().times(1).returning(|| true);

        let mut supervisor = MockSupervisor::new();
        supervisor.expect_is_running().times(1).returning(|| true);
        supervisor.expect_stop().times(0);
        supervisor.expect_start().times(0);

        let mut reconciler = Reconciler::new(test_config(), repository, probe, supervisor);
        reconciler.scan();
    }

    #[test]
    fn it_should_restart_the_app_if_it_is_gone() {
        let mut repository = MockRepository::new();
        repository.expect_exists().times(1).returning(|| true);
        repository
            .expect_origin_url()
            .times(1)
            .returning(|| Ok(String::from(URL)));
        repository
            .expect_checkout_path()
            .return_const(PathBuf::from("repo"));

        let mut probe = MockVersionProbe::new();
        probe.expect_matches().times(1).returning(|| true);

        let mut supervisor = MockSupervisor::new();
        supervisor.expect_is_running().times(1).returning(|| false);
        supervisor.expect_stop().times(0);
        expect_start(&mut supervisor);

        let mut reconciler = Reconciler::new(test_config(), repository, probe, supervisor);
        reconciler.scan();
    }

    #[test]
    fn it_should_abort_the_cycle_when_the_clone_fails() {
        let mut repository = MockRepository::new();
        repository.expect_exists().times(1).returning(|| false);
        repository.expect_remove().times(1).return_const(());
        repository.expect_clone_repository().times(1).returning(|| {
            Err(CloneError::CloneFailed(CommandError::NonZeroExitcode(
                128,
                String::from("fatal: repository not found"),
            )))
        });

        let probe = MockVersionProbe::new();

        // No process may be left behind after a failed clone.
        let mut supervisor = MockSupervisor::new();
        supervisor.expect_is_running().times(1).returning(|| false);
        supervisor.expect_stop().times(0);
        supervisor.expect_start().times(0);

        let mut reconciler = Reconciler::new(test_config(), repository, probe, supervisor);
        let summary = reconciler.scan();

        assert!(summary.contains("aborted"), "{summary:?}");
    }

    #[test]
    fn it_should_stop_the_app_on_shutdown() {
        let repository = MockRepository::new();
        let probe = MockVersionProbe::new();

        let mut supervisor = MockSupervisor::new();
        supervisor.expect_stop().times(1).return_const(());

        let mut reconciler = Reconciler::new(test_config(), repository, probe, supervisor);
        reconciler.shutdown();
    }

    mod end_to_end {
        use super::*;
        use crate::{
            repository::git::GitRepository, supervisor::process::ProcessSupervisor,
            version::describe::DescribeProbe,
        };
        use duct::cmd;
        use rand::distributions::{Alphanumeric, DistString};
        use std::{error::Error, fs};

        fn get_random_id() -> String {
            Alphanumeric.sample_string(&mut rand::thread_rng(), 16)
        }

        fn git_identity(directory: &str) -> Result<(), Box<dyn Error>> {
            cmd!("git", "config", "user.name", "tether")
                .dir(directory)
                .read()?;
            cmd!("git", "config", "user.email", "tether@example.invalid")
                .dir(directory)
                .read()?;

            Ok(())
        }

        fn create_remote(base: &str) -> Result<String, Box<dyn Error>> {
            let seed = format!("{base}-seed");
            let remote = format!("{base}-remote");

            fs::create_dir_all(&seed)?;
            cmd!("git", "init", "-b", "master").dir(&seed).read()?;
            git_identity(&seed)?;
            fs::write(format!("{seed}/1"), "1")?;
            cmd!("git", "add", "-A").dir(&seed).read()?;
            cmd!("git", "commit", "-m1").dir(&seed).read()?;
            cmd!("git", "tag", "v0.1.0").dir(&seed).read()?;
            cmd!("git", "clone", "--bare", &seed, &remote).read()?;

            Ok(fs::canonicalize(&remote)?.to_string_lossy().to_string())
        }

        fn advance_remote(base: &str) -> Result<(), Box<dyn Error>> {
            let remote = format!("{base}-remote");
            let other = format!("{base}-other");

            cmd!("git", "clone", &remote, &other).read()?;
            git_identity(&other)?;
            fs::write(format!("{other}/2"), "2")?;
            cmd!("git", "add", "-A").dir(&other).read()?;
            cmd!("git", "commit", "-m2").dir(&other).read()?;
            cmd!("git", "push", "origin", "master").dir(&other).read()?;

            Ok(())
        }

        fn cleanup(base: &str) -> Result<(), Box<dyn Error>> {
            for suffix in ["", "-seed", "-remote", "-other"] {
                let directory = format!("{base}{suffix}");
                if Path::new(&directory).exists() {
                    fs::remove_dir_all(directory)?;
                }
            }

            Ok(())
        }

        #[test]
        fn it_should_reconcile_a_real_repository() -> Result<(), Box<dyn Error>> {
            let id = get_random_id();
            let base = format!("test_directories/{id}");
            let url = create_remote(&base)?;
            fs::create_dir_all(&base)?;

            let config = Config {
                repository_url: url.clone(),
                branch: String::from("master"),
                start_command: String::from("sleep 30"),
            };
            let repository = GitRepository::new(&base, url);
            let probe = DescribeProbe::new(repository.checkout_path(), config.branch.clone());
            let supervisor = ProcessSupervisor::new();
            let mut reconciler = Reconciler::new(config, repository, probe, supervisor);

            // The first scan clones the checkout and starts the application.
            reconciler.scan();
            let checkout = Path::new(&base).join("repo");
            assert!(checkout.join("1").exists());
            assert!(reconciler.supervisor.is_running());

            // A scan over a current checkout changes nothing.
            reconciler.scan();
            assert!(!checkout.join("2").exists());

            // Once the remote moves ahead, the next scan re-clones.
            advance_remote(&base)?;
            reconciler.scan();
            assert!(checkout.join("2").exists());
            assert!(reconciler.supervisor.is_running());

            reconciler.shutdown();
            assert!(!reconciler.supervisor.is_running());

            cleanup(&base)?;

            Ok(())
        }
    }
}

use args::parse_args;
use std::{env, io, path::PathBuf, process, time::Duration};
use tether_bin::{
    config::{Config, ConfigError},
    reconciler::Reconciler,
    repository::{git::GitRepository, Repository},
    start::{start, StartError},
    supervisor::process::ProcessSupervisor,
    triggers::{
        http::HttpTrigger, once::OnceTrigger, schedule::ScheduleTrigger, signal::SignalTrigger,
        Trigger,
    },
    version::describe::DescribeProbe,
};
use thiserror::Error;

mod args;
mod logger;

/// A custom error for everything that can stop the program at startup.
#[derive(Debug, Error)]
pub enum MainError {
    /// The logger cannot be initialized.
    #[error("cannot initialize logger: {0}")]
    FailedLogger(#[from] log::SetLoggerError),
    /// The local timezone cannot be determined for log timestamps.
    #[error("cannot determine local timezone")]
    FailedLoggerTimezones,
    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// The directory to hold the checkout cannot be determined.
    #[error("cannot determine the directory to hold the checkout: {0}")]
    MissingRootDirectory(io::Error),
    /// The main loop failed.
    #[error("{0}")]
    FailedStart(#[from] StartError),
}

/// The directory of the running executable; unless overridden, the checkout
/// lives next to the program.
fn program_directory() -> Result<PathBuf, io::Error> {
    let executable = env::current_exe()?;
    let directory = executable.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "the executable has no parent directory",
        )
    })?;

    Ok(directory.to_path_buf())
}

fn run() -> Result<(), MainError> {
    let args = parse_args();

    if args.version {
        println!("tether {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logger::init_logger(&args)?;

    let config = Config::new(args.repository.as_deref(), &args.branch, args.start.as_deref())?;

    let root = match &args.directory {
        Some(directory) => PathBuf::from(directory),
        None => program_directory().map_err(MainError::MissingRootDirectory)?,
    };

    // Setup triggers.
    let mut triggers: Vec<Box<dyn Trigger>> = vec![];
    if args.once {
        triggers.push(Box::new(OnceTrigger));
    } else {
        let duration: Duration = args.delay.into();
        if !duration.is_zero() {
            triggers.push(Box::new(ScheduleTrigger::new(duration)));
        }
        if let Some(http) = args.http.clone() {
            triggers.push(Box::new(HttpTrigger::new(http)));
        }
        triggers.push(Box::new(SignalTrigger::new()));
    }

    // Setup the reconciler over the validated configuration.
    let repository = GitRepository::new(root, config.repository_url.clone());
    let probe = DescribeProbe::new(repository.checkout_path(), config.branch.clone());
    let supervisor = ProcessSupervisor::new();
    let mut reconciler = Reconciler::new(config, repository, probe, supervisor);

    start(triggers, &mut reconciler)?;

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        process::exit(1);
    }
}

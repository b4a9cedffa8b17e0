use super::{ProcessSignalError, Supervisor, SupervisorError};
use crate::command::parse_command_line;
use duct::{cmd, Handle};
use log::{debug, info, warn};
use std::{
    path::Path,
    thread::sleep,
    time::{Duration, Instant},
};

/// How long a stopped application gets to exit on SIGTERM before it is killed.
const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A supervisor that runs the application as a child process.
///
/// The registered [`Handle`] is the sole record of the running application;
/// there is no pid file or process-table scanning.
pub struct ProcessSupervisor {
    process: Option<Handle>,
}

impl ProcessSupervisor {
    /// Creates a supervisor with no registered process.
    pub fn new() -> Self {
        ProcessSupervisor { process: None }
    }

    /// Terminate the process: SIGTERM first, and a kill after the grace
    /// period for anything that ignores it. On non-unix systems there is no
    /// polite signal, so the process is killed right away.
    fn terminate(process: &Handle) -> Result<(), ProcessSignalError> {
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            for pid in process.pids() {
                kill(Pid::from_raw(pid as i32), Signal::SIGTERM)?;
            }

            let deadline = Instant::now() + STOP_GRACE_PERIOD;
            while Instant::now() < deadline {
                if process.try_wait()?.is_some() {
                    return Ok(());
                }
                sleep(STOP_POLL_INTERVAL);
            }
        }

        process.kill()?;
        Ok(())
    }
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor for ProcessSupervisor {
    fn is_running(&mut self) -> bool {
        let Some(process) = &self.process else {
            return false;
        };

        let exited = match process.try_wait() {
            Ok(None) => None,
            Ok(Some(output)) => Some(output.status),
            Err(err) => {
                warn!("Could not poll the application ({err}), assuming it is still running.");
                None
            }
        };

        match exited {
            None => true,
            Some(status) => {
                info!("Application exited on its own ({status}), unregistering it.");
                self.process = None;
                false
            }
        }
    }

    fn start(&mut self, checkout: &Path, start_command: &str) -> Result<(), SupervisorError> {
        if self.process.is_some() {
            return Err(SupervisorError::AlreadyRunning);
        }

        let (program, args) = parse_command_line(start_command)?;
        debug!(
            "Starting {program} with arguments {args:?} in {}.",
            checkout.display()
        );

        let handle = cmd(program, args).dir(checkout).start()?;
        self.process = Some(handle);

        Ok(())
    }

    fn stop(&mut self) {
        let Some(process) = self.process.take() else {
            return;
        };

        info!("Application alive, stopping...");
        match Self::terminate(&process) {
            Ok(()) => info!("Application terminated successfully."),
            Err(err) => warn!("Something went wrong while terminating the application: {err}."),
        }
    }
}

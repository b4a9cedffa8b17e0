use crate::{
    reconciler::Reconciler,
    repository::Repository,
    supervisor::Supervisor,
    triggers::{Trigger, TriggerError},
    version::VersionProbe,
};
use log::{debug, error, info};
use std::{sync::mpsc, thread};
use thiserror::Error;

/// A custom error implementation for the start function.
#[derive(Debug, Error)]
pub enum StartError {
    /// At least one trigger has to drive the loop.
    #[error("you have to define at least one trigger")]
    NoTriggers,
    /// A trigger failed.
    #[error("trigger failed: {0}")]
    FailedTrigger(#[from] TriggerError),
}

/// The main program loop: run the triggers and scan on every message.
///
/// Each trigger runs on its own thread and requests scans over a channel, so
/// scans are handled sequentially and never overlap. The loop ends when a
/// trigger asks for a shutdown or every trigger is gone; either way the
/// supervised application is stopped before returning.
pub fn start<R, P, S>(
    triggers: Vec<Box<dyn Trigger>>,
    reconciler: &mut Reconciler<R, P, S>,
) -> Result<(), StartError>
where
    R: Repository,
    P: VersionProbe,
    S: Supervisor,
{
    let (tx, rx) = mpsc::channel::<Option<()>>();

    if triggers.is_empty() {
        return Err(StartError::NoTriggers);
    }

    for trigger in triggers {
        let tx = tx.clone();
        thread::spawn(move || {
            if let Err(err) = trigger.listen(tx) {
                error!("Trigger failed: {err}.");
            }
        });
    }
    // Only the trigger threads hold senders now: the loop also ends when the
    // last trigger is gone.
    drop(tx);

    debug!("Waiting on triggers.");
    while let Ok(Some(())) = rx.recv() {
        let summary = reconciler.scan();
        debug!("{summary}");
    }

    info!("Shutting down.");
    reconciler.shutdown();

    Ok(())
}

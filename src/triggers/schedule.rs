use super::{Trigger, TriggerError};
use duration_string::DurationString;
use log::info;
use std::{
    sync::mpsc::Sender,
    thread::sleep,
    time::{Duration, Instant},
};

/// A trigger that requests a reconciliation scan periodically.
///
/// This is running in an infinite loop; the wait is measured from the start
/// of the step, so steps take the configured duration each.
pub struct ScheduleTrigger {
    duration: Duration,
}

impl ScheduleTrigger {
    /// Creates a new ScheduleTrigger with the given period.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Run one step of the schedule: request a scan, then wait out the rest
    /// of the period.
    pub fn step(&self, tx: &Sender<Option<()>>) -> Result<(), TriggerError> {
        let next_check = Instant::now() + self.duration;
        tx.send(Some(()))?;

        let until_next_check = next_check.saturating_duration_since(Instant::now());
        sleep(until_next_check);

        Ok(())
    }
}

impl Trigger for ScheduleTrigger {
    /// Request scans in an infinite loop, waiting the configured period
    /// between each.
    fn listen(&self, tx: Sender<Option<()>>) -> Result<(), TriggerError> {
        info!("Scanning every {}.", DurationString::new(self.duration));

        loop {
            self.step(&tx)?;
        }
    }
}

use super::{Trigger, TriggerError};
use std::sync::mpsc::Sender;

/// A trigger that requests a single scan and then exits. Useful for cronjobs.
pub struct OnceTrigger;

impl Trigger for OnceTrigger {
    /// Request one scan, then ask the main loop to shut down.
    fn listen(&self, tx: Sender<Option<()>>) -> Result<(), TriggerError> {
        tx.send(Some(()))?;
        tx.send(None)?;
        Ok(())
    }
}

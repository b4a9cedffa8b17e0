use super::{Trigger, TriggerError};
use log::debug;
use std::sync::{atomic::AtomicU8, mpsc::Sender};

/// A trigger that shuts the program down on a termination signal.
///
/// The first signal closes the scan loop, which stops the supervised
/// application before exiting. A second signal skips the cleanup and
/// terminates right away.
pub struct SignalTrigger {
    trigger_count: AtomicU8,
}

impl SignalTrigger {
    pub fn new() -> SignalTrigger {
        SignalTrigger {
            trigger_count: AtomicU8::new(0),
        }
    }

    #[cfg(unix)]
    fn listen_inner<I>(&self, tx: Sender<Option<()>>, signals: I) -> Result<(), TriggerError>
    where
        I: IntoIterator<Item = i32>,
    {
        use log::error;
        use std::{process, sync::atomic::Ordering, thread::sleep, time::Duration};

        for signal in signals.into_iter() {
            let previous = self.trigger_count.fetch_add(1, Ordering::Acquire);
            if previous == 0 {
                debug!("Got signal {signal}, shutting down after the running scan finishes.");
                if tx.send(None).is_err() {
                    error!("Failed shutting down on signal {signal}.");
                }
            } else {
                // Leave a little room for the clean shutdown to finish on its own.
                sleep(Duration::from_millis(100));
                debug!("Got signal {signal} again, terminating right now.");
                process::exit(signal);
            }
        }

        Ok(())
    }
}

impl Default for SignalTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl Trigger for SignalTrigger {
    /// Starts a trigger that iterates over termination signals and shuts the
    /// program down.
    #[cfg(unix)]
    fn listen(&self, tx: Sender<Option<()>>) -> Result<(), TriggerError> {
        use log::warn;
        use signal_hook::{
            consts::TERM_SIGNALS,
            iterator::{exfiltrator::SignalOnly, SignalsInfo},
        };

        let signals = SignalsInfo::<SignalOnly>::new(TERM_SIGNALS);
        if let Ok(mut signals) = signals {
            self.listen_inner(tx, &mut signals)?;
        } else {
            warn!("Failed setting up the signal handler.");
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn listen(&self, _tx: Sender<Option<()>>) -> Result<(), TriggerError> {
        debug!("Signal handlers are not supported on non-unix systems.");

        Ok(())
    }
}

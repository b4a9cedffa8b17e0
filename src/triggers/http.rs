use super::{Trigger, TriggerError};
use log::{debug, info};
use std::sync::mpsc::Sender;
use tiny_http::{Response, Server};

/// A trigger that requests a scan on every HTTP request.
///
/// Wire the address up as a push webhook (e.g. on GitHub) and the deployed
/// application is replaced right after a push, instead of on the next
/// schedule tick.
pub struct HttpTrigger {
    address: String,
}

impl HttpTrigger {
    /// Create a new HTTP trigger listening on the given address,
    /// for example "0.0.0.0:8000".
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

impl Trigger for HttpTrigger {
    /// Start a minimal HTTP 1.1 server that requests a scan on every request.
    ///
    /// Every method and every URL is answered with a plaintext 200 "OK".
    fn listen(&self, tx: Sender<Option<()>>) -> Result<(), TriggerError> {
        let server = Server::http(&self.address).map_err(|_| {
            TriggerError::Misconfigured(format!("cannot listen on {}", self.address))
        })?;
        info!("Listening on {}...", self.address);

        for request in server.incoming_requests() {
            debug!("Received request on {} {}.", request.method(), request.url());

            tx.send(Some(()))?;

            request.respond(Response::from_string("OK"))?;
        }

        Ok(())
    }
}

//! The `Node` runs chaincode invocations, one at a time, from a channel.
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::bank::{Chaincode, ChaincodeError, LedgerGateway};

/// Keeps an empty field as an empty argument. Only a missing column is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

/// One call read from the request input.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    function: String,
    #[serde(default, deserialize_with = "present")]
    arg1: Option<String>,
    #[serde(default, deserialize_with = "present")]
    arg2: Option<String>,
}

impl Invocation {
    #[cfg(test)]
    pub fn new(function: impl Into<String>, args: &[&str]) -> Self {
        let mut args = args.iter().map(|arg| arg.to_string());
        Invocation {
            function: function.into(),
            arg1: args.next(),
            arg2: args.next(),
        }
    }

    /// Gets the name of the called operation.
    pub fn get_function(&self) -> &str {
        &self.function
    }

    /// Arguments in order, skipping missing columns.
    pub fn get_args(&self) -> Vec<String> {
        [&self.arg1, &self.arg2].into_iter().flatten().cloned().collect()
    }
}

/// Whether an invocation produced a result or an error.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Outcome of one invocation, as written to the response output.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub function: String,
    pub status: ResponseStatus,
    pub output: String,
}

/// Owns the chaincode and processes invocations in arrival order.
pub struct Node<G> {
    chaincode: Chaincode<G>,
    /// A channel receiver for incoming invocations.
    receiver: mpsc::Receiver<Invocation>,
    /// Responses in invocation order.
    responses: Vec<Response>,
}

impl<G: LedgerGateway> Node<G> {
    pub fn new(chaincode: Chaincode<G>, receiver: mpsc::Receiver<Invocation>) -> Self {
        Node {
            chaincode,
            receiver,
            responses: Vec::new(),
        }
    }

    pub fn get_responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn get_chaincode(&self) -> &Chaincode<G> {
        &self.chaincode
    }

    /// Runs one invocation. Only fatal errors are returned; others become responses.
    fn process(&mut self, invocation: Invocation) -> Result<(), ChaincodeError> {
        let function = invocation.get_function().to_string();
        match self.chaincode.handle(&function, &invocation.get_args()) {
            Ok(output) => self.responses.push(Response {
                function,
                status: ResponseStatus::Ok,
                output,
            }),
            Err(err) => {
                self.responses.push(Response {
                    function: function.clone(),
                    status: ResponseStatus::Error,
                    output: err.to_string(),
                });
                if err.is_fatal() {
                    return Err(err);
                }
                warn!(%function, error = %err, "invocation failed");
            }
        }
        Ok(())
    }

    /// Processes invocations until the channel closes or a fatal error occurs.
    ///
    /// A fatal error closes the channel, so pending and later sends fail.
    pub async fn run(&mut self) -> Result<(), ChaincodeError> {
        while let Some(invocation) = self.receiver.recv().await {
            if let Err(err) = self.process(invocation) {
                error!(error = %err, "fatal ledger error, stopping");
                self.receiver.close();
                return Err(err);
            }
        }
        Ok(())
    }
}

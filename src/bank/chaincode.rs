//! Invocation surface: argument checks, payload decoding and dispatch.
use base64::{Engine, prelude::BASE64_STANDARD};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::bank::{
    AccountKey, AccountRecord, LedgerGateway, StoreError, TransactionsView, TransferContext,
    TransferError, TransferExecutor,
};

pub const TRANSFER: &str = "transfer";
pub const LIST_TRANSACTIONS: &str = "listTransactions";

/// Errors returned to the caller instead of a status line or document.
#[derive(Error, Debug)]
pub enum ChaincodeError {
    #[error("Incorrect number of arguments. {0}")]
    ArgumentCount(&'static str),
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("Invalid base64 in {field}: {source}")]
    Base64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },
    #[error("Invalid UTF-8 in {field}")]
    Utf8 { field: &'static str },
    #[error("Invalid account key: {0}")]
    InvalidAccountKey(#[source] serde_json::Error),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Ledger record {key} is corrupted: {reason}")]
    Corrupted { key: String, reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ChaincodeError {
    /// Corrupted ledger data cannot be repaired locally and must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ChaincodeError::Corrupted { .. }
                | ChaincodeError::Transfer(TransferError::Corrupted { .. })
        )
    }
}

fn decode_text(field: &'static str, encoded: &str) -> Result<String, ChaincodeError> {
    let bytes = BASE64_STANDARD
        .decode(encoded)
        .map_err(|source| ChaincodeError::Base64 { field, source })?;
    String::from_utf8(bytes).map_err(|_| ChaincodeError::Utf8 { field })
}

/// Transfer and history operations bound to one ledger store.
pub struct Chaincode<G> {
    gateway: G,
}

impl<G: LedgerGateway> Chaincode<G> {
    /// Binds the chaincode to the store named by its single argument.
    pub fn init<F>(args: &[String], connect: F) -> Result<Self, ChaincodeError>
    where
        F: FnOnce(&str) -> Result<G, StoreError>,
    {
        let [store_id] = args else {
            return Err(ChaincodeError::ArgumentCount("KVS chaincode id is expected"));
        };
        let gateway = connect(store_id.as_str())?;
        info!(store = gateway.store_id(), "chaincode initialized");
        Ok(Chaincode { gateway })
    }

    /// The store every call is bound to.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Routes a call to [`Chaincode::invoke`] or [`Chaincode::query`].
    pub fn handle(&mut self, function: &str, args: &[String]) -> Result<String, ChaincodeError> {
        match function {
            LIST_TRANSACTIONS => self.query(function, args),
            _ => self.invoke(function, args),
        }
    }

    /// State-changing operations.
    pub fn invoke(&mut self, function: &str, args: &[String]) -> Result<String, ChaincodeError> {
        match function {
            TRANSFER => {
                let [token, message] = args else {
                    return Err(ChaincodeError::ArgumentCount(
                        "2 parameters are expected: authToken, MT message",
                    ));
                };
                let context = TransferContext {
                    transaction_id: Uuid::new_v4().to_string(),
                    time: Utc::now(),
                };
                self.transfer(token, message, context)
            }
            other => Err(ChaincodeError::Unsupported(other.to_string())),
        }
    }

    /// Read-only operations.
    pub fn query(&self, function: &str, args: &[String]) -> Result<String, ChaincodeError> {
        match function {
            LIST_TRANSACTIONS => {
                let [token, account_key] = args else {
                    return Err(ChaincodeError::ArgumentCount(
                        "2 parameters are expected: authToken, accountId",
                    ));
                };
                self.list_transactions(token, account_key)
            }
            other => Err(ChaincodeError::Unsupported(other.to_string())),
        }
    }

    /// Runs one transfer. `token` is the base64 user key, `message` the base64 MT text.
    pub fn transfer(
        &mut self,
        token: &str,
        message: &str,
        context: TransferContext,
    ) -> Result<String, ChaincodeError> {
        let user_key = decode_text("authToken", token)?;
        let message = decode_text("MT message", message)?;
        let outcome = TransferExecutor::new(&mut self.gateway).execute(&user_key, &message, context)?;
        debug!(committed = outcome.committed, "transfer finished");
        Ok(outcome.status_line())
    }

    /// Returns the transaction history of the account named by the base64 JSON key.
    ///
    /// The token is decoded but not used for authorization.
    pub fn list_transactions(&self, token: &str, account_key: &str) -> Result<String, ChaincodeError> {
        let user_key = decode_text("authToken", token)?;
        debug!(user = %user_key, "history requested");

        let account_key: AccountKey = serde_json::from_str(&decode_text("accountId", account_key)?)
            .map_err(ChaincodeError::InvalidAccountKey)?;
        let key = account_key.to_store_key()?;

        let bytes = self.gateway.get(&key).map_err(|e| match e {
            StoreError::NotFound { key, .. } => ChaincodeError::AccountNotFound(key),
            other => ChaincodeError::Store(other),
        })?;
        let account = AccountRecord::from_bytes(&bytes).map_err(|e| ChaincodeError::Corrupted {
            key: key.clone(),
            reason: e.to_string(),
        })?;

        let view = TransactionsView::from(&account);
        info!(key = %key, entries = view.transactions.len(), "history listed");
        Ok(serde_json::to_string(&view)?)
    }
}

/// Encodes an invocation argument the way clients do.
#[cfg(test)]
pub(crate) fn encode_arg(text: &str) -> String {
    BASE64_STANDARD.encode(text)
}

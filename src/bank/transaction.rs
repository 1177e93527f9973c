//! Transaction records appended to account histories.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bank::{AccountKey, Organization, TransactionId};

/// Final status of a transfer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Failure,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Success => f.write_str("Success"),
            TransactionStatus::Failure => f.write_str("Failure"),
        }
    }
}

/// The inbound message and the reply produced for it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Details {
    #[serde(rename = "inputMessage")]
    pub input_message: String,

    #[serde(rename = "outputMessage")]
    pub output_message: String,
}

/// One transfer attempt. Never modified once appended to a history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    #[serde(rename = "transactionId")]
    pub transaction_id: TransactionId,

    pub sender: Organization,

    pub receiver: Organization,

    #[serde(rename = "senderAccountKey")]
    pub sender_account_key: AccountKey,

    #[serde(rename = "receiverAccountKey")]
    pub receiver_account_key: AccountKey,

    /// Charges, decimal-point text. Empty when the message carries none.
    pub fee: String,

    /// Transferred amount, decimal-point text.
    pub amount: String,

    #[serde(rename = "details")]
    pub details: Details,

    pub status: TransactionStatus,

    pub comment: String,

    /// RFC 3339 UTC timestamp.
    pub time: String,
}

impl Transaction {
    /// Marks the transaction as failed, keeping the first failure reason.
    pub fn fail(&mut self, comment: &str) {
        if self.status == TransactionStatus::Success {
            self.status = TransactionStatus::Failure;
            self.comment = comment.to_string();
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Success
    }

    /// Human-readable status line returned to the caller.
    pub fn status_line(&self) -> String {
        format!("Transaction status: {}; Comment: {}", self.status, self.comment)
    }
}

#[cfg(test)]
pub(crate) fn sample_transaction(id: &str) -> Transaction {
    use crate::bank::AccountType;

    Transaction {
        transaction_id: id.to_string(),
        sender: Organization::new("BANKBEBB", "12345678"),
        receiver: Organization::new("BANKUS33", "87654321"),
        sender_account_key: AccountKey::new("BANKDEFF", "BANKBEBB", "USD", AccountType::Nostro),
        receiver_account_key: AccountKey::new("BANKDEFF", "BANKUS33", "USD", AccountType::Vostro),
        fee: "5.00".to_string(),
        amount: "100.00".to_string(),
        details: Details::default(),
        status: TransactionStatus::Success,
        comment: String::new(),
        time: "2026-10-14T12:00:00Z".to_string(),
    }
}

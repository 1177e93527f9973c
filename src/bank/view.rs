//! Client-facing projection of an account's transaction history.
use serde::{Deserialize, Serialize};

use crate::bank::{AccountRecord, Details, Organization, Transaction};

/// Balance snapshot of an account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountState {
    pub amount: String,
    pub currency: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub sender: Organization,
    pub receiver: Organization,
    pub amount: String,
    pub currency: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub status: String,
    pub comment: String,
}

/// One history entry as shown to clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransactionView {
    pub id: String,
    pub transfer: Transfer,
    pub time: String,
    #[serde(rename = "transactionStatus")]
    pub status: StatusView,
    /// The account's balance now, not at the time of the transaction.
    #[serde(rename = "accountState")]
    pub account_state: AccountState,
    pub details: Details,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransactionsView {
    #[serde(rename = "accountState")]
    pub account_state: AccountState,
    pub transactions: Vec<TransactionView>,
}

impl TransactionView {
    fn project(transaction: &Transaction, state: &AccountState) -> Self {
        TransactionView {
            id: transaction.transaction_id.clone(),
            transfer: Transfer {
                sender: transaction.sender.clone(),
                receiver: transaction.receiver.clone(),
                amount: transaction.amount.clone(),
                currency: transaction.sender_account_key.currency.clone(),
            },
            time: transaction.time.clone(),
            status: StatusView {
                status: transaction.status.to_string(),
                comment: transaction.comment.clone(),
            },
            account_state: state.clone(),
            details: transaction.details.clone(),
        }
    }
}

impl From<&AccountRecord> for TransactionsView {
    /// Projects every stored transaction in insertion order.
    fn from(account: &AccountRecord) -> Self {
        let state = AccountState {
            amount: account.amount.clone(),
            currency: account.currency.clone(),
        };
        let transactions = account
            .transactions
            .iter()
            .map(|tx| TransactionView::project(tx, &state))
            .collect();
        TransactionsView {
            account_state: state,
            transactions,
        }
    }
}

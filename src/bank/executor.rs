//! Validates a transfer message against the ledger and commits its effects.
//!
//! The commit writes the debit record first and the credit record second, as two
//! independent puts. It is best-effort and not atomic: if the second put fails the
//! debit side stays written, and [`TransferError::Persist`] reports how far the
//! commit got.
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::bank::{
    AccountKey, AccountRecord, AccountType, Details, LedgerGateway, Organization, StoreError,
    Transaction, TransactionId, TransactionStatus, UserDetails, can_transfer, format_balance,
    is_transfer_allowed, net_amount, parse_amount, parse_fee,
};
use crate::message::{TransferRequest, render_forward, render_rejection};

pub const SENDER_ACCOUNT_UNAVAILABLE: &str = "Unable to get sender account";
pub const USER_UNAVAILABLE: &str = "Unable to get user by the token";
pub const PERMISSION_DENIED: &str = "User doesn't have the permission for the action";
pub const INSUFFICIENT_FUNDS: &str = "Unable to transfer the requested amount";

/// Errors that abort a transfer instead of being recorded as a failure.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Ledger record {key} is corrupted: {reason}")]
    Corrupted { key: String, reason: String },
    #[error("Failed to write {key} (debit committed: {debit_committed}): {source}")]
    Persist {
        key: String,
        debit_committed: bool,
        #[source]
        source: StoreError,
    },
    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Identity and clock of one invocation.
#[derive(Debug, Clone)]
pub struct TransferContext {
    pub transaction_id: TransactionId,
    pub time: DateTime<Utc>,
}

/// Result of a transfer that ran to completion.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub transaction: Transaction,
    /// False when the sender account could not be read and nothing was written.
    pub committed: bool,
}

impl TransferOutcome {
    pub fn status_line(&self) -> String {
        self.transaction.status_line()
    }
}

/// Account debited by the transfer: the sender's nostro account at the receiver.
pub fn debit_account_key(request: &TransferRequest) -> AccountKey {
    AccountKey::new(
        request.receiver_bic(),
        request.sender_bic(),
        request.currency(),
        AccountType::Nostro,
    )
}

/// Account credited by the transfer: the intermediary's vostro account at the receiver.
pub fn credit_account_key(request: &TransferRequest) -> AccountKey {
    AccountKey::new(
        request.receiver_bic(),
        request.intermediary_bic(),
        request.currency(),
        AccountType::Vostro,
    )
}

/// Runs transfers against one ledger gateway.
pub struct TransferExecutor<'a, G> {
    gateway: &'a mut G,
}

impl<'a, G: LedgerGateway> TransferExecutor<'a, G> {
    pub fn new(gateway: &'a mut G) -> Self {
        TransferExecutor { gateway }
    }

    /// Processes one transfer message on behalf of the user stored under `user_key`.
    ///
    /// Business failures (missing records, permission denial, insufficient funds)
    /// are returned as a `Failure` transaction. Only a corrupted record during the
    /// commit or a failed write is an error.
    ///
    /// Checks run in order and the first failing one sets the comment: a user
    /// without permission reports [`PERMISSION_DENIED`] even when funds are short.
    /// Charges larger than the amount count as insufficient funds.
    pub fn execute(
        &mut self,
        user_key: &str,
        message: &str,
        context: TransferContext,
    ) -> Result<TransferOutcome, TransferError> {
        let request = TransferRequest::decode(message);
        let mut transaction = new_transaction(&request, message, context);
        let debit_key = transaction.sender_account_key.to_store_key()?;

        let Some(account) = self.fetch_account(&debit_key) else {
            transaction.fail(SENDER_ACCOUNT_UNAVAILABLE);
            warn!(id = %transaction.transaction_id, key = %debit_key, "sender account unavailable");
            transaction.details.output_message = render_reply(message, &request, &transaction);
            return Ok(TransferOutcome {
                transaction,
                committed: false,
            });
        };

        self.authorize(user_key, &mut transaction);
        if transaction.is_success()
            && (!can_transfer(&account.amount, request.amount(), request.fee())
                || net_amount(request.amount(), request.fee()).is_none())
        {
            transaction.fail(INSUFFICIENT_FUNDS);
        }
        if !transaction.is_success() {
            warn!(id = %transaction.transaction_id, comment = %transaction.comment, "transfer rejected");
        }

        transaction.details.output_message = render_reply(message, &request, &transaction);
        self.commit(&request, &transaction)?;

        info!(
            id = %transaction.transaction_id,
            status = %transaction.status,
            "transaction recorded"
        );
        Ok(TransferOutcome {
            transaction,
            committed: true,
        })
    }

    /// Reads an account during validation. Any problem means "unavailable".
    fn fetch_account(&self, key: &str) -> Option<AccountRecord> {
        let bytes = self.gateway.get(key).ok()?;
        let account = AccountRecord::from_bytes(&bytes).ok()?;
        (!account.is_blank()).then_some(account)
    }

    fn authorize(&self, user_key: &str, transaction: &mut Transaction) {
        let user = self
            .gateway
            .get(user_key)
            .ok()
            .and_then(|bytes| UserDetails::from_bytes(&bytes).ok());
        let Some(user) = user else {
            transaction.fail(USER_UNAVAILABLE);
            return;
        };
        if !is_transfer_allowed(&user.permissions, &transaction.sender_account_key) {
            transaction.fail(PERMISSION_DENIED);
        }
    }

    /// Reads an account during the commit. Failing here means the store is corrupted.
    fn refetch_account(&self, key: &str) -> Result<AccountRecord, TransferError> {
        let bytes = self.gateway.get(key).map_err(|e| corrupted(key, e.to_string()))?;
        AccountRecord::from_bytes(&bytes).map_err(|e| corrupted(key, e.to_string()))
    }

    fn commit(
        &mut self,
        request: &TransferRequest,
        transaction: &Transaction,
    ) -> Result<(), TransferError> {
        let debit_key = transaction.sender_account_key.to_store_key()?;
        let credit_key = transaction.receiver_account_key.to_store_key()?;
        let mut debit = self.refetch_account(&debit_key)?;
        let mut credit = self.refetch_account(&credit_key)?;

        if transaction.is_success() {
            let (amount, fee) = transfer_values(request, &debit_key)?;
            let debit_balance = stored_balance(&debit, &debit_key)?;
            let credit_balance = stored_balance(&credit, &credit_key)?;
            let overflow = |key: &str| corrupted(key, "balance overflow".to_string());
            let debited = debit_balance
                .checked_sub(amount)
                .and_then(|rest| rest.checked_sub(fee))
                .ok_or_else(|| overflow(&debit_key))?;
            let credited = credit_balance
                .checked_add(amount)
                .ok_or_else(|| overflow(&credit_key))?;
            debit.amount = format_balance(debited);
            credit.amount = format_balance(credited);
        }

        debit.transactions.push(transaction.clone());
        credit.transactions.push(transaction.clone());

        self.write(&debit_key, &debit, false)?;
        self.write(&credit_key, &credit, true)
    }

    fn write(
        &mut self,
        key: &str,
        account: &AccountRecord,
        debit_committed: bool,
    ) -> Result<(), TransferError> {
        let bytes = account.to_bytes()?;
        self.gateway.put(key, &bytes).map_err(|source| {
            error!(key, debit_committed, "failed to write account record");
            TransferError::Persist {
                key: key.to_string(),
                debit_committed,
                source,
            }
        })
    }
}

fn corrupted(key: &str, reason: String) -> TransferError {
    error!(key, %reason, "corrupted ledger record");
    TransferError::Corrupted {
        key: key.to_string(),
        reason,
    }
}

fn stored_balance(account: &AccountRecord, key: &str) -> Result<Decimal, TransferError> {
    account
        .balance()
        .ok_or_else(|| corrupted(key, format!("invalid balance {:?}", account.amount)))
}

fn transfer_values(request: &TransferRequest, key: &str) -> Result<(Decimal, Decimal), TransferError> {
    match (parse_amount(request.amount()), parse_fee(request.fee())) {
        (Some(amount), Some(fee)) => Ok((amount, fee)),
        _ => Err(corrupted(key, "transfer amount changed after validation".to_string())),
    }
}

fn new_transaction(request: &TransferRequest, message: &str, context: TransferContext) -> Transaction {
    Transaction {
        transaction_id: context.transaction_id,
        sender: Organization::new(request.sender_bic(), request.credit_account()),
        receiver: Organization::new(request.intermediary_bic(), request.benefit_account()),
        sender_account_key: debit_account_key(request),
        receiver_account_key: credit_account_key(request),
        fee: request.fee().unwrap_or_default().to_string(),
        amount: request.amount().to_string(),
        details: Details {
            input_message: message.to_string(),
            output_message: String::new(),
        },
        status: TransactionStatus::Success,
        comment: String::new(),
        time: context.time.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

fn render_reply(message: &str, request: &TransferRequest, transaction: &Transaction) -> String {
    match transaction.status {
        TransactionStatus::Success => render_forward(message, request),
        TransactionStatus::Failure => {
            render_rejection(request, &transaction.transaction_id, &transaction.comment)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::bank::{MemoryStore, Permission, PermissionAccountKey};
    use crate::message::fixtures::{MT103, mt103_with};

    const USER: &str = "user-1";

    fn debit_key() -> String {
        AccountKey::new("BANKDEFF", "BANKBEBB", "USD", AccountType::Nostro)
            .to_store_key()
            .unwrap()
    }

    fn credit_key() -> String {
        AccountKey::new("BANKDEFF", "BANKUS33", "USD", AccountType::Vostro)
            .to_store_key()
            .unwrap()
    }

    fn allow_debit() -> Permission {
        Permission {
            key: PermissionAccountKey {
                key_type: "account".to_string(),
                holder: "BANKDEFF".to_string(),
                owner: "BANKBEBB".to_string(),
                currency: "USD".to_string(),
                account_type: "nostro".to_string(),
            },
            access: "write".to_string(),
        }
    }

    fn put_account(store: &mut MemoryStore, key: &str, amount: &str, account_type: &str) {
        let record = AccountRecord::open(amount, "USD", account_type, "2017-01-01", "1");
        store.put(key, &record.to_bytes().unwrap()).unwrap();
    }

    fn ledger(sender_balance: &str, permissions: Vec<Permission>) -> MemoryStore {
        let mut store = MemoryStore::open("kvs");
        put_account(&mut store, &debit_key(), sender_balance, "nostro");
        put_account(&mut store, &credit_key(), "250.00", "vostro");
        let user = UserDetails {
            password: "secret".to_string(),
            permissions,
        };
        store.put(USER, &user.to_bytes().unwrap()).unwrap();
        store
    }

    fn context() -> TransferContext {
        TransferContext {
            transaction_id: "tx-1".to_string(),
            time: Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap(),
        }
    }

    fn account(store: &MemoryStore, key: &str) -> AccountRecord {
        AccountRecord::from_bytes(&store.get(key).unwrap()).unwrap()
    }

    #[test]
    fn test_successful_transfer() {
        let mut store = ledger("1000.00", vec![allow_debit()]);
        let outcome = TransferExecutor::new(&mut store)
            .execute(USER, MT103, context())
            .unwrap();

        assert!(outcome.committed);
        assert_eq!(outcome.status_line(), "Transaction status: Success; Comment: ");

        let debit = account(&store, &debit_key());
        let credit = account(&store, &credit_key());
        assert_eq!(debit.amount, "895.00");
        assert_eq!(credit.amount, "350.00");
        assert_eq!(debit.transactions, vec![outcome.transaction.clone()]);
        assert_eq!(credit.transactions, vec![outcome.transaction.clone()]);

        let tx = &outcome.transaction;
        assert_eq!(tx.sender, Organization::new("BANKBEBB", "12345678"));
        assert_eq!(tx.receiver, Organization::new("BANKUS33", "87654321"));
        assert_eq!(tx.amount, "100.00");
        assert_eq!(tx.fee, "5.00");
        assert_eq!(tx.time, "2026-10-14T12:00:00Z");
        assert_eq!(tx.details.input_message, MT103);
        assert!(tx.details.output_message.contains(":52A:BANKBEBB"));
    }

    #[test]
    fn test_insufficient_funds() {
        let mut store = ledger("50.00", vec![allow_debit()]);
        let outcome = TransferExecutor::new(&mut store)
            .execute(USER, MT103, context())
            .unwrap();

        assert_eq!(
            outcome.status_line(),
            "Transaction status: Failure; Comment: Unable to transfer the requested amount"
        );
        assert!(outcome.committed);

        let debit = account(&store, &debit_key());
        let credit = account(&store, &credit_key());
        assert_eq!(debit.amount, "50.00");
        assert_eq!(credit.amount, "250.00");
        assert_eq!(debit.transactions.len(), 1);
        assert_eq!(credit.transactions.len(), 1);
        assert_eq!(debit.transactions[0].status, TransactionStatus::Failure);
        assert!(
            debit.transactions[0]
                .details
                .output_message
                .starts_with("{1:F01BANKDEFFXXXX0000000000}{2:I199BANKBEBBXXXXN}")
        );
    }

    #[test]
    fn test_exact_balance() {
        let mut store = ledger("105.00", vec![allow_debit()]);
        let outcome = TransferExecutor::new(&mut store)
            .execute(USER, MT103, context())
            .unwrap();

        assert!(outcome.transaction.is_success());
        assert_eq!(account(&store, &debit_key()).amount, "0.00");
    }

    #[test]
    fn test_no_permissions() {
        let mut store = ledger("1000.00", Vec::new());
        let outcome = TransferExecutor::new(&mut store)
            .execute(USER, MT103, context())
            .unwrap();

        assert_eq!(outcome.transaction.comment, PERMISSION_DENIED);
        assert_eq!(account(&store, &debit_key()).amount, "1000.00");
        assert_eq!(account(&store, &credit_key()).amount, "250.00");
    }

    #[test]
    fn test_unknown_user() {
        let mut store = ledger("1000.00", vec![allow_debit()]);
        let outcome = TransferExecutor::new(&mut store)
            .execute("nobody", MT103, context())
            .unwrap();

        assert_eq!(outcome.transaction.comment, USER_UNAVAILABLE);
        assert!(outcome.committed);
        assert_eq!(account(&store, &debit_key()).transactions.len(), 1);
    }

    #[test]
    fn test_missing_sender_account_is_not_recorded() {
        let mut store = ledger("1000.00", vec![allow_debit()]);
        let message = MT103.replace("BANKBEBB", "BANKFRPP");
        let outcome = TransferExecutor::new(&mut store)
            .execute(USER, &message, context())
            .unwrap();

        assert!(!outcome.committed);
        assert_eq!(outcome.transaction.comment, SENDER_ACCOUNT_UNAVAILABLE);
        assert!(outcome.transaction.details.output_message.contains(":20:HL-tx-1\r\n"));
        assert!(account(&store, &debit_key()).transactions.is_empty());
        assert!(account(&store, &credit_key()).transactions.is_empty());
    }

    #[test]
    fn test_blank_sender_account() {
        let mut store = ledger("1000.00", vec![allow_debit()]);
        store.put(&debit_key(), b"{}").unwrap();
        let outcome = TransferExecutor::new(&mut store)
            .execute(USER, MT103, context())
            .unwrap();

        assert_eq!(outcome.transaction.comment, SENDER_ACCOUNT_UNAVAILABLE);
        assert!(!outcome.committed);
    }

    #[test]
    fn test_malformed_amount() {
        let mut store = ledger("1000.00", vec![allow_debit()]);
        let message = mt103_with("ABC", "5,00");
        let outcome = TransferExecutor::new(&mut store)
            .execute(USER, &message, context())
            .unwrap();

        assert_eq!(outcome.transaction.comment, INSUFFICIENT_FUNDS);
        assert_eq!(account(&store, &debit_key()).amount, "1000.00");
    }

    #[test]
    fn test_corrupted_credit_account() {
        let mut store = ledger("1000.00", vec![allow_debit()]);
        store.put(&credit_key(), b"not json").unwrap();
        let result = TransferExecutor::new(&mut store).execute(USER, MT103, context());

        assert!(matches!(result, Err(TransferError::Corrupted { key, .. }) if key == credit_key()));
        assert_eq!(account(&store, &debit_key()).amount, "1000.00");
    }

    #[test]
    fn test_missing_credit_account() {
        let mut store = ledger("1000.00", vec![allow_debit()]);
        let message = MT103.replace(":57A:BANKUS33", ":57A:BANKJPJT");
        let result = TransferExecutor::new(&mut store).execute(USER, &message, context());

        assert!(matches!(result, Err(TransferError::Corrupted { .. })));
    }

    /// Fails every write to one key.
    struct FailingPut {
        inner: MemoryStore,
        key: String,
    }

    impl LedgerGateway for FailingPut {
        fn store_id(&self) -> &str {
            self.inner.store_id()
        }

        fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
            self.inner.get(key)
        }

        fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
            if key == self.key {
                Err(StoreError::Unavailable {
                    store: self.inner.store_id().to_string(),
                    reason: "write rejected".to_string(),
                })
            } else {
                self.inner.put(key, value)
            }
        }
    }

    #[test]
    fn test_partial_commit() {
        let mut store = FailingPut {
            inner: ledger("1000.00", vec![allow_debit()]),
            key: credit_key(),
        };
        let result = TransferExecutor::new(&mut store).execute(USER, MT103, context());

        assert!(matches!(
            result,
            Err(TransferError::Persist {
                debit_committed: true,
                ..
            })
        ));
        assert_eq!(account(&store.inner, &debit_key()).amount, "895.00");
        assert_eq!(account(&store.inner, &credit_key()).amount, "250.00");
    }

    #[test]
    fn test_failed_debit_write() {
        let mut store = FailingPut {
            inner: ledger("1000.00", vec![allow_debit()]),
            key: debit_key(),
        };
        let result = TransferExecutor::new(&mut store).execute(USER, MT103, context());

        assert!(matches!(
            result,
            Err(TransferError::Persist {
                debit_committed: false,
                ..
            })
        ));
        let debit = account(&store.inner, &debit_key());
        let credit = account(&store.inner, &credit_key());
        assert_eq!(debit.amount, "1000.00");
        assert_eq!(credit.amount, "250.00");
        assert!(debit.transactions.is_empty());
        assert!(credit.transactions.is_empty());
    }

    #[test]
    fn test_credit_balance_overflow() {
        let mut store = ledger("1000.00", vec![allow_debit()]);
        put_account(&mut store, &credit_key(), "79228162514264337593543950335", "vostro");
        let result = TransferExecutor::new(&mut store).execute(USER, MT103, context());

        assert!(matches!(result, Err(TransferError::Corrupted { key, .. }) if key == credit_key()));
        let debit = account(&store, &debit_key());
        assert_eq!(debit.amount, "1000.00");
        assert!(debit.transactions.is_empty());
    }

    #[test]
    fn test_fee_exceeds_amount() {
        let mut store = ledger("1000.00", vec![allow_debit()]);
        let message = mt103_with("5,00", "10,00");
        let outcome = TransferExecutor::new(&mut store)
            .execute(USER, &message, context())
            .unwrap();

        assert_eq!(outcome.transaction.comment, INSUFFICIENT_FUNDS);
        assert!(outcome.transaction.details.output_message.contains(":79:"));
        assert_eq!(account(&store, &debit_key()).amount, "1000.00");
        assert_eq!(account(&store, &credit_key()).amount, "250.00");
    }

    #[test]
    fn test_permission_failure_wins_over_funds() {
        let mut store = ledger("50.00", Vec::new());
        let outcome = TransferExecutor::new(&mut store)
            .execute(USER, MT103, context())
            .unwrap();

        assert_eq!(outcome.transaction.comment, PERMISSION_DENIED);
    }
}

//! Loads ledger records from CSV files into a store.
use std::collections::HashMap;
use std::io;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::bank::{
    AccountKey, AccountRecord, AccountType, LedgerGateway, MemoryStore, Permission,
    PermissionAccountKey, StoreError, UserDetails,
};

/// Errors that can occur while loading seed data.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One account per row.
#[derive(Deserialize, Debug)]
struct AccountRow {
    holder_bic: String,
    owner_bic: String,
    currency: String,
    #[serde(rename = "type")]
    account_type: AccountType,
    amount: String,
    date: String,
    number: String,
}

/// One permission per row. Rows sharing a `user_key` form one user.
#[derive(Deserialize, Debug)]
struct UserRow {
    user_key: String,
    password: String,
    key_type: String,
    holder: String,
    owner: String,
    currency: String,
    account_type: String,
    access: String,
}

fn reader<R: io::Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new().trim(Trim::All).from_reader(input)
}

/// Stores every account row under its canonical key. Returns the number of accounts.
pub fn load_accounts<G, R>(gateway: &mut G, input: R) -> Result<usize, SeedError>
where
    G: LedgerGateway,
    R: io::Read,
{
    let mut count = 0;
    for row in reader(input).deserialize() {
        let row: AccountRow = row?;
        let key = AccountKey::new(row.holder_bic, row.owner_bic, row.currency, row.account_type);
        let record = AccountRecord::open(
            row.amount,
            key.currency.clone(),
            row.account_type.as_str(),
            row.date,
            row.number,
        );
        gateway.put(&key.to_store_key()?, &record.to_bytes()?)?;
        count += 1;
    }
    Ok(count)
}

/// Stores one user per distinct `user_key`. Returns the number of users.
pub fn load_users<G, R>(gateway: &mut G, input: R) -> Result<usize, SeedError>
where
    G: LedgerGateway,
    R: io::Read,
{
    let mut users: HashMap<String, UserDetails> = HashMap::new();
    for row in reader(input).deserialize() {
        let row: UserRow = row?;
        let user = users.entry(row.user_key).or_insert_with(|| UserDetails {
            password: row.password,
            permissions: Vec::new(),
        });
        user.permissions.push(Permission {
            key: PermissionAccountKey {
                key_type: row.key_type,
                holder: row.holder,
                owner: row.owner,
                currency: row.currency,
                account_type: row.account_type,
            },
            access: row.access,
        });
    }
    for (key, user) in &users {
        gateway.put(key, &user.to_bytes()?)?;
    }
    Ok(users.len())
}

/// Opens a memory store named `store_id` holding the given accounts and users.
pub fn open_seeded<A, U>(store_id: &str, accounts: A, users: U) -> Result<MemoryStore, StoreError>
where
    A: io::Read,
    U: io::Read,
{
    let mut store = MemoryStore::open(store_id);
    let unavailable = |err: SeedError| StoreError::Unavailable {
        store: store_id.to_string(),
        reason: err.to_string(),
    };
    let account_count = load_accounts(&mut store, accounts).map_err(unavailable)?;
    let user_count = load_users(&mut store, users).map_err(unavailable)?;
    info!(store = store_id, accounts = account_count, users = user_count, "ledger seeded");
    Ok(store)
}

//! The ledger gateway: key/value access to account and user records.
use std::collections::HashMap;

use thiserror::Error;

/// Errors reported by a ledger store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Key not found in store {store}: {key}")]
    NotFound { store: String, key: String },
    #[error("Store {store} is unavailable: {reason}")]
    Unavailable { store: String, reason: String },
}

/// Blocking access to one store instance.
///
/// A single `put` is atomic per key. Separate puts are independent: there is no
/// multi-key transaction.
pub trait LedgerGateway {
    /// Identifier of the store instance this gateway is bound to.
    fn store_id(&self) -> &str;

    /// Reads the value under `key`. A missing key is [`StoreError::NotFound`].
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Writes `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// In-process store bound to one store id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    store_id: String,
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Opens an empty store instance.
    pub fn open(store_id: impl Into<String>) -> Self {
        MemoryStore {
            store_id: store_id.into(),
            entries: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LedgerGateway for MemoryStore {
    fn store_id(&self) -> &str {
        &self.store_id
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                store: self.store_id.clone(),
                key: key.to_string(),
            })
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut store = MemoryStore::open("kvs");
        assert!(store.is_empty());
        store.put("a", b"1").unwrap();
        store.put("a", b"2").unwrap();
        assert_eq!(store.get("a").unwrap(), b"2");
        assert_eq!(store.len(), 1);
        assert_eq!(store.store_id(), "kvs");
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::open("kvs");
        assert!(matches!(
            store.get("missing"),
            Err(StoreError::NotFound { key, .. }) if key == "missing"
        ));
    }
}

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Account;
use crate::store::AccountStore;

/// In-memory account store with one-shot failure injection, used by tests
/// and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<String, Vec<Account>>>,
    fail_fetch: AtomicBool,
    fail_put: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn seed(&self, user_id: &str, accounts: Vec<Account>) {
        if let Ok(mut map) = self.accounts.lock() {
            map.insert(user_id.to_string(), accounts);
        }
    }

    /// Make the next fetch fail with a not-found error.
    pub fn fail_next_fetch(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    /// Make the next overwrite fail with a database error.
    pub fn fail_next_put(&self) {
        self.fail_put.store(true, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn fetch_accounts(&self, user_id: &str) -> Result<Vec<Account>, StoreError> {
        if self.fail_fetch.swap(false, Ordering::SeqCst) {
            return Err(StoreError::NotFound(user_id.to_string()));
        }
        let map = self
            .accounts
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(map.get(user_id).cloned().unwrap_or_default())
    }

    async fn put_accounts(&self, user_id: &str, accounts: &[Account]) -> Result<(), StoreError> {
        if self.fail_put.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Database("write rejected".to_string()));
        }
        let mut map = self
            .accounts
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        map.insert(user_id.to_string(), accounts.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Account;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// The account-store collaborator. The pipeline only needs two
/// capabilities: fetch a user's whole account collection, and overwrite
/// it. No finer-grained interface (append-single-trade) is assumed.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn fetch_accounts(&self, user_id: &str) -> Result<Vec<Account>, StoreError>;

    /// Replace the user's account collection. Implementations are expected
    /// to make this all-or-nothing; the sqlite store wraps it in a single
    /// transaction.
    async fn put_accounts(&self, user_id: &str, accounts: &[Account]) -> Result<(), StoreError>;
}

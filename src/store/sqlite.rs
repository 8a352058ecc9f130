use async_trait::async_trait;
use rusqlite::params;

use crate::db::Database;
use crate::error::StoreError;
use crate::models::Account;
use crate::store::AccountStore;

/// Sqlite-backed account store. Accounts are stored document-style, one
/// row per account with the trade list serialized into a JSON column, so
/// the overwrite capability maps onto a single transaction.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        SqliteStore { db }
    }

    pub fn open(path: &str) -> Result<Self, StoreError> {
        Ok(SqliteStore::new(Database::new(path)?))
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(SqliteStore::new(Database::in_memory()?))
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn fetch_accounts(&self, user_id: &str) -> Result<Vec<Account>, StoreError> {
        let conn = self
            .db
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn.prepare(
            "SELECT id, name, broker, balance, trades, created_at, updated_at
             FROM accounts WHERE user_id = ? ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt.query_map([user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
            ))
        })?;

        let mut accounts = Vec::new();
        for row in rows {
            let (id, name, broker, balance, trades_json, created_at, updated_at) = row?;
            accounts.push(Account {
                id,
                name,
                broker,
                balance,
                trades: serde_json::from_str(&trades_json)?,
                created_at,
                updated_at,
            });
        }
        Ok(accounts)
    }

    async fn put_accounts(&self, user_id: &str, accounts: &[Account]) -> Result<(), StoreError> {
        let mut conn = self
            .db
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // Whole-collection overwrite in one transaction: either every
        // account lands or none does.
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM accounts WHERE user_id = ?", [user_id])?;
        for account in accounts {
            let trades_json = serde_json::to_string(&account.trades)?;
            tx.execute(
                "INSERT INTO accounts (id, user_id, name, broker, balance, trades, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    account.id,
                    user_id,
                    account.name,
                    account.broker,
                    account.balance,
                    trades_json,
                    account.created_at,
                    account.updated_at,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MarketType, Trade, TradeDirection};

    fn sample_trade() -> Trade {
        Trade {
            id: Trade::generate_id(),
            symbol: "AAPL".to_string(),
            date: 1_705_276_800.0,
            direction: TradeDirection::Long,
            entry: 100.0,
            exit: 110.0,
            size: 10.0,
            take_profit: None,
            stop_loss: Some(95.0),
            market: MarketType::Futures,
            commission: 0.0,
            tick_value: 5.0,
            pip_value: 10.0,
            pnl: 500.0,
            notes: Some("imported".to_string()),
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn put_then_fetch_round_trips() {
        let store = SqliteStore::in_memory().unwrap();
        let mut account = Account::new("Main", "ProBroker", 1000.0);
        account.trades.push(sample_trade());

        store.put_accounts("local", &[account.clone()]).await.unwrap();

        let fetched = store.fetch_accounts("local").await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, account.id);
        assert_eq!(fetched[0].balance, 1000.0);
        assert_eq!(fetched[0].trades.len(), 1);
        assert_eq!(fetched[0].trades[0].symbol, "AAPL");
        assert_eq!(fetched[0].trades[0].stop_loss, Some(95.0));
    }

    #[tokio::test]
    async fn overwrite_replaces_the_whole_collection() {
        let store = SqliteStore::in_memory().unwrap();
        let a = Account::new("Old", "ProBroker", 0.0);
        let b = Account::new("New", "ProBroker", 0.0);

        store.put_accounts("local", &[a]).await.unwrap();
        store.put_accounts("local", &[b.clone()]).await.unwrap();

        let fetched = store.fetch_accounts("local").await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, b.id);
    }

    #[tokio::test]
    async fn collections_are_scoped_per_user() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .put_accounts("alice", &[Account::new("A", "X", 0.0)])
            .await
            .unwrap();
        store
            .put_accounts("bob", &[Account::new("B", "Y", 0.0)])
            .await
            .unwrap();

        assert_eq!(store.fetch_accounts("alice").await.unwrap().len(), 1);
        assert_eq!(store.fetch_accounts("bob").await.unwrap().len(), 1);
        assert!(store.fetch_accounts("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tradelog.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::open(path).unwrap();
            store
                .put_accounts("local", &[Account::new("Main", "ProBroker", 42.0)])
                .await
                .unwrap();
        }

        let store = SqliteStore::open(path).unwrap();
        let fetched = store.fetch_accounts("local").await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].balance, 42.0);
    }
}

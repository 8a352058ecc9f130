use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::Trade;

/// A journal account. The trade list is embedded, document-style; the
/// store reads and writes whole accounts, never individual trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub broker: String,
    pub balance: f64,
    pub trades: Vec<Trade>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Account {
    pub fn new(name: impl Into<String>, broker: impl Into<String>, balance: f64) -> Self {
        let now = Utc::now().timestamp();
        Account {
            id: Account::generate_id(),
            name: name.into(),
            broker: broker.into(),
            balance,
            trades: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn generate_id() -> String {
        let uuid = uuid::Uuid::new_v4().to_string();
        let prefix = uuid.split('-').next().unwrap_or("0");
        format!("ACCT-{}-{}", Utc::now().timestamp_millis(), prefix)
    }
}

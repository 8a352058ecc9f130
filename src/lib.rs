pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod notify;
pub mod stats;
pub mod store;

pub use error::{ImportError, StoreError};
pub use import::{ColumnMapping, ImportDefaults, ImportOutcome, ImportSession, ImportStep, TargetField};
pub use models::{Account, MarketType, Trade, TradeDirection};
pub use notify::{LogNotifier, NoticeKind, Notifier};
pub use store::{AccountStore, MemoryStore, SqliteStore};

pub mod commit;
pub mod mapping;
pub mod pnl;
pub mod session;
pub mod tokenizer;
pub mod transform;
pub mod validate;

pub use commit::ImportOutcome;
pub use mapping::{ColumnMapping, TargetField};
pub use pnl::ImportDefaults;
pub use session::{ImportSession, ImportStep, MAX_IMPORT_BYTES};
pub use tokenizer::{CsvDocument, RawRow};
pub use validate::RowError;

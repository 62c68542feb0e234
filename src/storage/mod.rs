//! Storage layer: abstraction traits plus the CSV/YAML file implementation.

pub mod csv;
pub mod traits;

pub use traits::{
    ChainUpdate, Connection, DailyRecordStorage, FinancialRecordStorage, FlockStorage,
    LedgerStorage,
};

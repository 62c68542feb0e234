//! # CSV Storage Module
//!
//! File-backed storage for the poultry ledger. Each flock gets its own
//! directory holding a `flock.yaml` metadata file and a `daily.csv` of
//! operational records; financial records and general ledger entries live
//! in single CSV files at the base directory.
//!
//! ## Layout
//!
//! ```text
//! <base>/
//!   flocks/<flock_id>/flock.yaml
//!   flocks/<flock_id>/daily.csv
//!   financial.csv
//!   ledger.csv
//! ```
//!
//! Repositories read a whole file, operate on the in-memory vector, and
//! rewrite it through a temp file rename, so a crash mid-write never leaves
//! a half-written record file behind.

pub mod connection;
pub mod daily_repository;
pub mod financial_repository;
pub mod flock_repository;
pub mod ledger_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use daily_repository::DailyRecordRepository;
pub use financial_repository::FinancialRecordRepository;
pub use flock_repository::FlockRepository;
pub use ledger_repository::LedgerRepository;

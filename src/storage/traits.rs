//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::daily_record::DailyRecord;
use crate::domain::models::financial_record::FinancialRecord;
use crate::domain::models::flock::Flock;
use crate::domain::models::ledger_entry::LedgerEntry;

/// Trait defining the interface for flock storage operations
pub trait FlockStorage: Send + Sync {
    /// Store a new flock
    fn store_flock(&self, flock: &Flock) -> Result<()>;

    /// Retrieve a specific flock by ID
    fn get_flock(&self, flock_id: &str) -> Result<Option<Flock>>;

    /// List all flocks, most recently created first
    fn list_flocks(&self) -> Result<Vec<Flock>>;

    /// Update an existing flock
    fn update_flock(&self, flock: &Flock) -> Result<()>;

    /// Delete a flock by ID
    ///
    /// Removes only the flock itself; the caller is responsible for
    /// cascading over dependent records first.
    fn delete_flock(&self, flock_id: &str) -> Result<()>;
}

/// Recomputed chain figures for one daily record, produced by a headcount
/// recalculation and applied in bulk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainUpdate {
    pub record_id: String,
    pub age_days: u32,
    pub opening_birds: u32,
    pub closing_birds: u32,
}

/// Trait defining the interface for daily record storage operations
pub trait DailyRecordStorage: Send + Sync {
    /// Store a new daily record
    fn store_record(&self, record: &DailyRecord) -> Result<()>;

    /// Retrieve a specific daily record by ID
    fn get_record(&self, flock_id: &str, record_id: &str) -> Result<Option<DailyRecord>>;

    /// List a flock's daily records in chronological order (oldest first),
    /// same-day ties broken by creation time
    fn list_records(&self, flock_id: &str) -> Result<Vec<DailyRecord>>;

    /// Get the most recent daily record for a flock (for chaining the next
    /// entry's opening count and age)
    fn get_latest_record(&self, flock_id: &str) -> Result<Option<DailyRecord>>;

    /// Get all records on or after a date, in chronological order.
    /// This is the input to a headcount chain recalculation.
    fn get_records_since(&self, flock_id: &str, date: NaiveDate) -> Result<Vec<DailyRecord>>;

    /// Get the most recent record strictly before a date.
    /// This seeds the chain when recalculating from that date.
    fn get_latest_record_before_date(
        &self,
        flock_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>>;

    /// Update an existing daily record
    fn update_record(&self, record: &DailyRecord) -> Result<()>;

    /// Delete a single daily record
    /// Returns true if the record was found and deleted, false otherwise
    fn delete_record(&self, flock_id: &str, record_id: &str) -> Result<bool>;

    /// Apply recomputed chain figures to multiple records in one rewrite
    fn update_chain_fields(&self, flock_id: &str, updates: &[ChainUpdate]) -> Result<()>;

    /// Delete every daily record of a flock (cascade path)
    /// Returns the number of records removed
    fn delete_all_records(&self, flock_id: &str) -> Result<u32>;
}

/// Trait defining the interface for financial record storage operations
pub trait FinancialRecordStorage: Send + Sync {
    /// Store a new financial record
    fn store_record(&self, record: &FinancialRecord) -> Result<()>;

    /// Retrieve a specific financial record by ID
    fn get_record(&self, record_id: &str) -> Result<Option<FinancialRecord>>;

    /// List financial records in chronological order (oldest first).
    /// `flock_id = None` lists every record, assigned to a flock or not;
    /// `Some(id)` lists only records assigned to that flock.
    fn list_records(&self, flock_id: Option<&str>) -> Result<Vec<FinancialRecord>>;

    /// Update an existing financial record
    fn update_record(&self, record: &FinancialRecord) -> Result<()>;

    /// Delete a single financial record
    /// Returns true if the record was found and deleted, false otherwise
    fn delete_record(&self, record_id: &str) -> Result<bool>;

    /// Delete every financial record assigned to a flock (cascade path)
    /// Returns the number of records removed
    fn delete_records_for_flock(&self, flock_id: &str) -> Result<u32>;
}

/// Trait defining the interface for general ledger storage operations
pub trait LedgerStorage: Send + Sync {
    /// Store a new ledger entry
    fn store_entry(&self, entry: &LedgerEntry) -> Result<()>;

    /// List all ledger entries in chronological order (oldest first)
    fn list_entries(&self) -> Result<Vec<LedgerEntry>>;
}

/// Trait defining the interface for storage connections
///
/// This abstracts away the specific connection type and provides a factory
/// for the repository the generic headcount machinery depends on, so that
/// chain maintenance works against any storage backend.
pub trait Connection: Send + Sync + Clone {
    /// The type of DailyRecordStorage this connection creates
    type DailyRecordRepository: DailyRecordStorage + Clone;

    /// Create a new daily record repository for this connection
    fn create_daily_record_repository(&self) -> Self::DailyRecordRepository;
}

//! Command and result types for the general ledger.
use crate::domain::models::ledger_entry::{LedgerEntry, LedgerEntryType};

#[derive(Debug, Clone)]
pub struct CreateLedgerEntryCommand {
    /// Calendar date, `YYYY-MM-DD`
    pub entry_date: String,
    pub account: String,
    pub entry_type: LedgerEntryType,
    pub amount: f64,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct CreateLedgerEntryResult {
    pub entry: LedgerEntry,
}

/// Filters applied to both listing and summarizing. All fields are optional;
/// an empty query covers the whole ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerEntryQuery {
    pub account: Option<String>,
    pub entry_type: Option<LedgerEntryType>,
    /// Inclusive lower bound, `YYYY-MM-DD`
    pub from_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    pub to_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LedgerEntryListResult {
    /// Chronological, oldest first
    pub entries: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub total_debits: f64,
    pub total_credits: f64,
    /// Debits minus credits
    pub net: f64,
}

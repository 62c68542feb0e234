//! Domain model for a general ledger entry.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::random_suffix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEntryType {
    Debit,
    Credit,
}

impl LedgerEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerEntryType::Debit => "Debit",
            LedgerEntryType::Credit => "Credit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Debit" => Some(LedgerEntryType::Debit),
            "Credit" => Some(LedgerEntryType::Credit),
            _ => None,
        }
    }
}

/// One dated debit or credit against a named account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub entry_date: NaiveDate,
    pub account: String,
    pub entry_type: LedgerEntryType,
    pub amount: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Generate a unique ledger entry ID from a millisecond timestamp.
    /// Format: led-<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("led-{}-{}", timestamp_ms, random_suffix(4))
    }
}

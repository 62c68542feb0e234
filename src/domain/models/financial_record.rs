//! Domain model for an ad-hoc money movement.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::random_suffix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinancialEntryType {
    Expense,
    Income,
}

impl FinancialEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialEntryType::Expense => "expense",
            FinancialEntryType::Income => "income",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "expense" => Some(FinancialEntryType::Expense),
            "income" => Some(FinancialEntryType::Income),
            _ => None,
        }
    }
}

/// One discrete expense or income, optionally tied to a flock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: String,
    /// `None` means the record applies to the operation as a whole rather
    /// than a single flock
    pub flock_id: Option<String>,
    pub record_date: NaiveDate,
    pub entry_type: FinancialEntryType,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl FinancialRecord {
    /// Generate a unique financial record ID from a millisecond timestamp.
    /// Format: fin-<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("fin-{}-{}", timestamp_ms, random_suffix(4))
    }
}

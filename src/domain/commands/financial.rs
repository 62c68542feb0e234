//! Command and result types for financial record operations.
use crate::domain::models::financial_record::{FinancialEntryType, FinancialRecord};

#[derive(Debug, Clone)]
pub struct CreateFinancialRecordCommand {
    /// `None` records the movement against the operation as a whole
    pub flock_id: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub record_date: String,
    pub entry_type: FinancialEntryType,
    /// Defaults to `"misc"` when absent or blank
    pub category: Option<String>,
    pub amount: f64,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct CreateFinancialRecordResult {
    pub record: FinancialRecord,
}

#[derive(Debug, Clone)]
pub struct UpdateFinancialAmountCommand {
    pub record_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct UpdateFinancialAmountResult {
    pub record: FinancialRecord,
}

#[derive(Debug, Clone)]
pub struct DeleteFinancialRecordCommand {
    pub record_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteFinancialRecordResult {
    pub success_message: String,
}

#[derive(Debug, Clone)]
pub struct FinancialRecordListQuery {
    /// `None` lists every record, assigned to a flock or not
    pub flock_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FinancialRecordListResult {
    /// Chronological, oldest first
    pub records: Vec<FinancialRecord>,
}

//! Command and result types for daily record operations.
use crate::domain::models::daily_record::DailyRecord;

#[derive(Debug, Clone)]
pub struct CreateDailyRecordCommand {
    pub flock_id: String,
    /// Calendar date, `YYYY-MM-DD`
    pub record_date: String,
    pub feed_type: String,
    pub feed_cost_per_kg: f64,
    pub current_feed_kg: f64,
    pub avg_weight_grams: f64,
    pub mortality: u32,
    pub birds_sold: u32,
    pub birds_sold_kg: f64,
    pub selling_price_per_kg: f64,
    pub remarks: String,
}

#[derive(Debug, Clone)]
pub struct CreateDailyRecordResult {
    pub record: DailyRecord,
    /// Number of records whose chain figures were rewritten because the new
    /// entry was backdated
    pub recalculated: usize,
}

#[derive(Debug, Clone)]
pub struct UpdateDailyRecordCommand {
    pub flock_id: String,
    pub record_id: String,
    pub record_date: Option<String>,
    pub feed_type: Option<String>,
    pub feed_cost_per_kg: Option<f64>,
    pub current_feed_kg: Option<f64>,
    pub avg_weight_grams: Option<f64>,
    pub mortality: Option<u32>,
    pub birds_sold: Option<u32>,
    pub birds_sold_kg: Option<f64>,
    pub selling_price_per_kg: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateDailyRecordResult {
    pub record: DailyRecord,
    pub recalculated: usize,
}

#[derive(Debug, Clone)]
pub struct DeleteDailyRecordCommand {
    pub flock_id: String,
    pub record_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteDailyRecordResult {
    pub success_message: String,
    pub recalculated: usize,
}

#[derive(Debug, Clone)]
pub struct DailyRecordListQuery {
    pub flock_id: String,
}

#[derive(Debug, Clone)]
pub struct DailyRecordListResult {
    /// Chronological, oldest first
    pub records: Vec<DailyRecord>,
}

//! Query and result types for flock reports.
use crate::domain::models::daily_record::DailyRecord;
use crate::domain::models::financial_record::FinancialRecord;
use crate::domain::models::flock::Flock;
use crate::domain::rollup::ReportSummary;

#[derive(Debug, Clone)]
pub struct FlockReportQuery {
    pub flock_id: String,
}

/// Everything the presentation layer needs to render a flock's final
/// report: the flock, its full history, and the rolled-up summary.
#[derive(Debug, Clone)]
pub struct FlockReport {
    pub flock: Flock,
    /// Chronological, oldest first
    pub daily_records: Vec<DailyRecord>,
    pub financial_records: Vec<FinancialRecord>,
    /// Rounded to two decimals for display
    pub summary: ReportSummary,
}

#[derive(Debug, Clone)]
pub struct FlockReportResult {
    pub report: FlockReport,
}

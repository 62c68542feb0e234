//! Report assembly for a flock's lifetime.
//!
//! Fetches the flock and its full history, runs the rollup engine over it
//! and hands the presentation layer everything it needs for the summary
//! table and the printable final report.

use anyhow::{anyhow, Result};
use log::info;
use std::sync::Arc;

use crate::domain::commands::reports::{FlockReport, FlockReportQuery, FlockReportResult};
use crate::domain::rollup::aggregate_flock_report;
use crate::storage::csv::{
    CsvConnection, DailyRecordRepository, FinancialRecordRepository, FlockRepository,
};
use crate::storage::traits::{DailyRecordStorage, FinancialRecordStorage, FlockStorage};

/// Service that builds flock reports
#[derive(Clone)]
pub struct ReportService {
    flock_repository: FlockRepository,
    daily_repository: DailyRecordRepository,
    financial_repository: FinancialRecordRepository,
}

impl ReportService {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            flock_repository: FlockRepository::new(connection.clone()),
            daily_repository: DailyRecordRepository::new(connection.clone()),
            financial_repository: FinancialRecordRepository::new(connection),
        }
    }

    /// Build the final report for one flock.
    ///
    /// Financial records not assigned to any flock are deliberately left
    /// out; they belong to the operation, not to this cohort.
    pub fn build_flock_report(&self, query: FlockReportQuery) -> Result<FlockReportResult> {
        info!("Building report for flock {}", query.flock_id);

        let flock = self
            .flock_repository
            .get_flock(&query.flock_id)?
            .ok_or_else(|| anyhow!("Flock not found: {}", query.flock_id))?;

        let daily_records = self.daily_repository.list_records(&query.flock_id)?;
        let financial_records = self
            .financial_repository
            .list_records(Some(&query.flock_id))?;

        let summary = aggregate_flock_report(&flock, &daily_records, &financial_records).rounded();

        info!(
            "Report for flock {}: {} daily records, {} financial records, profit {}",
            flock.id,
            daily_records.len(),
            financial_records.len(),
            summary.profit
        );

        Ok(FlockReportResult {
            report: FlockReport {
                flock,
                daily_records,
                financial_records,
                summary,
            },
        })
    }
}

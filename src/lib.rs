//! # Poultry Ledger Backend
//!
//! File-backed bookkeeping services for a broiler operation: flock
//! management, the daily headcount chain, ad-hoc financial records, a
//! general debit/credit ledger, and lifetime flock reports.
//!
//! The crate is synchronous and UI-agnostic:
//! - Services take command values and return plain result values for a
//!   frontend to render
//! - All storage goes through the traits in [`storage`], with a CSV/YAML
//!   implementation under [`storage::csv`]
//! - The rollup computations in [`domain::rollup`] are pure functions with
//!   no process-wide state

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod storage;

// Re-export commonly used types
pub use storage::csv::CsvConnection;

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub flock_service: domain::FlockService,
    pub daily_service: domain::DailyRecordService,
    pub financial_service: domain::FinancialService,
    pub ledger_service: domain::LedgerService,
    pub report_service: domain::ReportService,
    pub headcount_service: domain::HeadcountService<CsvConnection>,
}

impl Backend {
    /// Create a new backend instance rooted at the given data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let connection = Arc::new(CsvConnection::new(data_dir)?);

        // Initialize all services
        let headcount_service = domain::HeadcountService::new(connection.clone());
        let flock_service = domain::FlockService::new(connection.clone());
        let daily_service =
            domain::DailyRecordService::new(connection.clone(), headcount_service.clone());
        let financial_service = domain::FinancialService::new(connection.clone());
        let ledger_service = domain::LedgerService::new(connection.clone());
        let report_service = domain::ReportService::new(connection);

        Ok(Backend {
            flock_service,
            daily_service,
            financial_service,
            ledger_service,
            report_service,
            headcount_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::daily::CreateDailyRecordCommand;
    use crate::domain::commands::flocks::CreateFlockCommand;
    use crate::domain::commands::reports::FlockReportQuery;

    #[test]
    fn test_backend_wires_services_over_one_data_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let backend = Backend::new(temp_dir.path()).unwrap();

        let flock = backend
            .flock_service
            .create_flock(CreateFlockCommand {
                breed: "Cobb 500".to_string(),
                arrival_date: "2024-03-01".to_string(),
                initial_chicks: 100,
                extra_chicks: 0,
                price_per_chick: 50.0,
            })
            .unwrap()
            .flock;

        backend
            .daily_service
            .create_daily_record(CreateDailyRecordCommand {
                flock_id: flock.id.clone(),
                record_date: "2024-03-02".to_string(),
                feed_type: "Starter".to_string(),
                feed_cost_per_kg: 40.0,
                current_feed_kg: 5.0,
                avg_weight_grams: 45.0,
                mortality: 2,
                birds_sold: 0,
                birds_sold_kg: 0.0,
                selling_price_per_kg: 0.0,
                remarks: String::new(),
            })
            .unwrap();

        let report = backend
            .report_service
            .build_flock_report(FlockReportQuery {
                flock_id: flock.id.clone(),
            })
            .unwrap()
            .report;
        assert_eq!(report.summary.feed_cost_total, 200.0);

        assert!(backend
            .headcount_service
            .validate_chain(&flock)
            .unwrap()
            .is_empty());
    }
}

//! Domain layer: models, commands, the rollup engine and the services
//! that orchestrate storage around it.

pub mod commands;
pub mod daily_service;
pub mod financial_service;
pub mod flock_service;
pub mod headcount_service;
pub mod ledger_service;
pub mod models;
pub mod report_service;
pub mod rollup;

pub use daily_service::DailyRecordService;
pub use financial_service::FinancialService;
pub use flock_service::FlockService;
pub use headcount_service::HeadcountService;
pub use ledger_service::LedgerService;
pub use report_service::ReportService;

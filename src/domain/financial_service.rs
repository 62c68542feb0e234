//! Financial record service domain logic for the poultry ledger.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::financial::{
    CreateFinancialRecordCommand, CreateFinancialRecordResult, DeleteFinancialRecordCommand,
    DeleteFinancialRecordResult, FinancialRecordListQuery, FinancialRecordListResult,
    UpdateFinancialAmountCommand, UpdateFinancialAmountResult,
};
use crate::domain::models::financial_record::FinancialRecord;
use crate::storage::csv::{CsvConnection, FinancialRecordRepository, FlockRepository};
use crate::storage::traits::{FinancialRecordStorage, FlockStorage};

/// Service for managing ad-hoc expenses and income
#[derive(Clone)]
pub struct FinancialService {
    financial_repository: FinancialRecordRepository,
    flock_repository: FlockRepository,
}

impl FinancialService {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            financial_repository: FinancialRecordRepository::new(connection.clone()),
            flock_repository: FlockRepository::new(connection),
        }
    }

    /// Create a financial record, optionally tied to a flock
    pub fn create_financial_record(
        &self,
        command: CreateFinancialRecordCommand,
    ) -> Result<CreateFinancialRecordResult> {
        if command.amount == 0.0 {
            return Err(anyhow!("Amount must be non-zero"));
        }

        let record_date = NaiveDate::parse_from_str(&command.record_date, "%Y-%m-%d")
            .context("Invalid record date format in create_financial_record command")?;

        if let Some(flock_id) = &command.flock_id {
            if self.flock_repository.get_flock(flock_id)?.is_none() {
                return Err(anyhow!("Flock not found: {}", flock_id));
            }
        }

        let category = match command.category {
            Some(category) if !category.trim().is_empty() => category.trim().to_string(),
            _ => "misc".to_string(),
        };

        let now = Utc::now();
        let record = FinancialRecord {
            id: FinancialRecord::generate_id(now.timestamp_millis() as u64),
            flock_id: command.flock_id,
            record_date,
            entry_type: command.entry_type,
            category,
            amount: command.amount,
            description: command.description,
            created_at: now,
        };

        self.financial_repository.store_record(&record)?;

        info!(
            "Created financial record {} ({} {})",
            record.id,
            record.entry_type.as_str(),
            record.amount
        );
        Ok(CreateFinancialRecordResult { record })
    }

    /// List financial records, either one flock's or all of them
    pub fn list_financial_records(
        &self,
        query: FinancialRecordListQuery,
    ) -> Result<FinancialRecordListResult> {
        let records = self
            .financial_repository
            .list_records(query.flock_id.as_deref())?;
        Ok(FinancialRecordListResult { records })
    }

    /// Change a record's amount. The entry form only ever re-prompts for
    /// the amount, so that is the one field that can be edited.
    pub fn update_financial_amount(
        &self,
        command: UpdateFinancialAmountCommand,
    ) -> Result<UpdateFinancialAmountResult> {
        if command.amount == 0.0 {
            return Err(anyhow!("Amount must be non-zero"));
        }

        let mut record = self
            .financial_repository
            .get_record(&command.record_id)?
            .ok_or_else(|| anyhow!("Financial record not found: {}", command.record_id))?;

        record.amount = command.amount;
        self.financial_repository.update_record(&record)?;

        info!("Updated financial record {} amount", record.id);
        Ok(UpdateFinancialAmountResult { record })
    }

    /// Delete a financial record
    pub fn delete_financial_record(
        &self,
        command: DeleteFinancialRecordCommand,
    ) -> Result<DeleteFinancialRecordResult> {
        let deleted = self.financial_repository.delete_record(&command.record_id)?;
        if !deleted {
            return Err(anyhow!("Financial record not found: {}", command.record_id));
        }

        Ok(DeleteFinancialRecordResult {
            success_message: "Financial record deleted".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::flocks::CreateFlockCommand;
    use crate::domain::flock_service::FlockService;
    use crate::domain::models::financial_record::FinancialEntryType;
    use crate::storage::csv::test_utils::test_connection;

    fn create_test_services() -> (FinancialService, FlockService, tempfile::TempDir) {
        let (connection, temp_dir) = test_connection();
        let financial_service = FinancialService::new(connection.clone());
        let flock_service = FlockService::new(connection);
        (financial_service, flock_service, temp_dir)
    }

    fn create_test_flock(flock_service: &FlockService) -> String {
        flock_service
            .create_flock(CreateFlockCommand {
                breed: "Cobb 500".to_string(),
                arrival_date: "2024-03-01".to_string(),
                initial_chicks: 100,
                extra_chicks: 0,
                price_per_chick: 50.0,
            })
            .unwrap()
            .flock
            .id
    }

    fn expense(flock_id: Option<String>, amount: f64) -> CreateFinancialRecordCommand {
        CreateFinancialRecordCommand {
            flock_id,
            record_date: "2024-03-05".to_string(),
            entry_type: FinancialEntryType::Expense,
            category: Some("vaccine".to_string()),
            amount,
            description: "Gumboro dose".to_string(),
        }
    }

    #[test]
    fn test_blank_category_defaults_to_misc() {
        let (financial_service, _flock_service, _temp_dir) = create_test_services();

        let mut command = expense(None, 350.0);
        command.category = Some("   ".to_string());
        let created = financial_service.create_financial_record(command).unwrap();
        assert_eq!(created.record.category, "misc");

        let mut command = expense(None, 200.0);
        command.category = None;
        let created = financial_service.create_financial_record(command).unwrap();
        assert_eq!(created.record.category, "misc");
    }

    #[test]
    fn test_zero_amount_rejected() {
        let (financial_service, _flock_service, _temp_dir) = create_test_services();
        assert!(financial_service
            .create_financial_record(expense(None, 0.0))
            .is_err());
    }

    #[test]
    fn test_unknown_flock_rejected() {
        let (financial_service, _flock_service, _temp_dir) = create_test_services();
        let result =
            financial_service.create_financial_record(expense(Some("fl-ghost".to_string()), 10.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_filters_by_flock() {
        let (financial_service, flock_service, _temp_dir) = create_test_services();
        let flock_id = create_test_flock(&flock_service);

        financial_service
            .create_financial_record(expense(Some(flock_id.clone()), 100.0))
            .unwrap();
        financial_service
            .create_financial_record(expense(None, 40.0))
            .unwrap();

        let for_flock = financial_service
            .list_financial_records(FinancialRecordListQuery {
                flock_id: Some(flock_id.clone()),
            })
            .unwrap();
        assert_eq!(for_flock.records.len(), 1);
        assert_eq!(for_flock.records[0].flock_id, Some(flock_id));

        let all = financial_service
            .list_financial_records(FinancialRecordListQuery { flock_id: None })
            .unwrap();
        assert_eq!(all.records.len(), 2);
    }

    #[test]
    fn test_update_amount_only() {
        let (financial_service, _flock_service, _temp_dir) = create_test_services();
        let created = financial_service
            .create_financial_record(expense(None, 100.0))
            .unwrap();

        let updated = financial_service
            .update_financial_amount(UpdateFinancialAmountCommand {
                record_id: created.record.id.clone(),
                amount: 175.0,
            })
            .unwrap();
        assert_eq!(updated.record.amount, 175.0);
        assert_eq!(updated.record.category, created.record.category);

        assert!(financial_service
            .update_financial_amount(UpdateFinancialAmountCommand {
                record_id: created.record.id,
                amount: 0.0,
            })
            .is_err());
    }

    #[test]
    fn test_delete_financial_record() {
        let (financial_service, _flock_service, _temp_dir) = create_test_services();
        let created = financial_service
            .create_financial_record(expense(None, 100.0))
            .unwrap();

        financial_service
            .delete_financial_record(DeleteFinancialRecordCommand {
                record_id: created.record.id.clone(),
            })
            .unwrap();

        let result = financial_service.delete_financial_record(DeleteFinancialRecordCommand {
            record_id: created.record.id,
        });
        assert!(result.is_err());
    }
}

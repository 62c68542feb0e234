//! General ledger domain logic: dated debit/credit entries against named
//! accounts, with filtered listing and summary totals.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::ledger::{
    CreateLedgerEntryCommand, CreateLedgerEntryResult, LedgerEntryListResult, LedgerEntryQuery,
    LedgerSummary,
};
use crate::domain::models::ledger_entry::{LedgerEntry, LedgerEntryType};
use crate::domain::rollup::round2;
use crate::storage::csv::{CsvConnection, LedgerRepository};
use crate::storage::traits::LedgerStorage;

/// Service for the general transaction ledger
#[derive(Clone)]
pub struct LedgerService {
    ledger_repository: LedgerRepository,
}

impl LedgerService {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            ledger_repository: LedgerRepository::new(connection),
        }
    }

    /// Record a debit or credit against an account.
    /// Amounts are kept to whole cents, matching what the entry form posts.
    pub fn add_entry(&self, command: CreateLedgerEntryCommand) -> Result<CreateLedgerEntryResult> {
        if command.account.trim().is_empty() {
            return Err(anyhow!("Account name is required"));
        }
        if command.amount <= 0.0 {
            return Err(anyhow!("Amount must be a positive number"));
        }

        let entry_date = NaiveDate::parse_from_str(&command.entry_date, "%Y-%m-%d")
            .context("Invalid entry date format in add_entry command")?;

        let now = Utc::now();
        let entry = LedgerEntry {
            id: LedgerEntry::generate_id(now.timestamp_millis() as u64),
            entry_date,
            account: command.account.trim().to_string(),
            entry_type: command.entry_type,
            amount: round2(command.amount),
            description: command.description.trim().to_string(),
            created_at: now,
        };

        self.ledger_repository.store_entry(&entry)?;

        info!(
            "Recorded ledger entry {} ({} {} on {})",
            entry.id,
            entry.entry_type.as_str(),
            entry.amount,
            entry.account
        );
        Ok(CreateLedgerEntryResult { entry })
    }

    /// List entries matching the query, in chronological order
    pub fn list_entries(&self, query: LedgerEntryQuery) -> Result<LedgerEntryListResult> {
        let entries = self.filtered_entries(&query)?;
        Ok(LedgerEntryListResult { entries })
    }

    /// Total debits, credits and their difference over the filtered set
    pub fn summarize(&self, query: LedgerEntryQuery) -> Result<LedgerSummary> {
        let entries = self.filtered_entries(&query)?;

        let mut total_debits = 0.0;
        let mut total_credits = 0.0;
        for entry in &entries {
            match entry.entry_type {
                LedgerEntryType::Debit => total_debits += entry.amount,
                LedgerEntryType::Credit => total_credits += entry.amount,
            }
        }

        Ok(LedgerSummary {
            total_debits,
            total_credits,
            net: total_debits - total_credits,
        })
    }

    fn filtered_entries(&self, query: &LedgerEntryQuery) -> Result<Vec<LedgerEntry>> {
        let from_date = query
            .from_date
            .as_deref()
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()
            .context("Invalid from date in ledger query")?;
        let to_date = query
            .to_date
            .as_deref()
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()
            .context("Invalid to date in ledger query")?;

        let mut entries = self.ledger_repository.list_entries()?;
        if let Some(account) = &query.account {
            entries.retain(|e| &e.account == account);
        }
        if let Some(entry_type) = query.entry_type {
            entries.retain(|e| e.entry_type == entry_type);
        }
        if let Some(from_date) = from_date {
            entries.retain(|e| e.entry_date >= from_date);
        }
        if let Some(to_date) = to_date {
            entries.retain(|e| e.entry_date <= to_date);
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ledger_entry::LedgerEntryType;
    use crate::storage::csv::test_utils::test_connection;

    fn create_test_service() -> (LedgerService, tempfile::TempDir) {
        let (connection, temp_dir) = test_connection();
        (LedgerService::new(connection), temp_dir)
    }

    fn entry(
        date: &str,
        account: &str,
        entry_type: LedgerEntryType,
        amount: f64,
    ) -> CreateLedgerEntryCommand {
        CreateLedgerEntryCommand {
            entry_date: date.to_string(),
            account: account.to_string(),
            entry_type,
            amount,
            description: String::new(),
        }
    }

    #[test]
    fn test_add_entry_validates_inputs() {
        let (service, _temp_dir) = create_test_service();

        assert!(service
            .add_entry(entry("2024-04-01", "  ", LedgerEntryType::Debit, 10.0))
            .is_err());
        assert!(service
            .add_entry(entry("2024-04-01", "Bank", LedgerEntryType::Debit, 0.0))
            .is_err());
        assert!(service
            .add_entry(entry("2024-04-01", "Bank", LedgerEntryType::Debit, -5.0))
            .is_err());
        assert!(service
            .add_entry(entry("not-a-date", "Bank", LedgerEntryType::Debit, 5.0))
            .is_err());
    }

    #[test]
    fn test_amount_kept_to_whole_cents() {
        let (service, _temp_dir) = create_test_service();
        let created = service
            .add_entry(entry("2024-04-01", "Bank", LedgerEntryType::Debit, 10.009))
            .unwrap();
        assert_eq!(created.entry.amount, 10.01);
    }

    #[test]
    fn test_filters_apply_to_listing() {
        let (service, _temp_dir) = create_test_service();
        service
            .add_entry(entry("2024-04-01", "Bank", LedgerEntryType::Debit, 100.0))
            .unwrap();
        service
            .add_entry(entry("2024-04-02", "Cash", LedgerEntryType::Credit, 30.0))
            .unwrap();
        service
            .add_entry(entry("2024-04-10", "Bank", LedgerEntryType::Credit, 20.0))
            .unwrap();

        let by_account = service
            .list_entries(LedgerEntryQuery {
                account: Some("Bank".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_account.entries.len(), 2);

        let by_type = service
            .list_entries(LedgerEntryQuery {
                entry_type: Some(LedgerEntryType::Credit),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_type.entries.len(), 2);

        let by_range = service
            .list_entries(LedgerEntryQuery {
                from_date: Some("2024-04-02".to_string()),
                to_date: Some("2024-04-09".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_range.entries.len(), 1);
        assert_eq!(by_range.entries[0].account, "Cash");
    }

    #[test]
    fn test_summary_totals() {
        let (service, _temp_dir) = create_test_service();
        service
            .add_entry(entry("2024-04-01", "Bank", LedgerEntryType::Debit, 100.0))
            .unwrap();
        service
            .add_entry(entry("2024-04-02", "Bank", LedgerEntryType::Debit, 50.0))
            .unwrap();
        service
            .add_entry(entry("2024-04-03", "Cash", LedgerEntryType::Credit, 60.0))
            .unwrap();

        let summary = service.summarize(LedgerEntryQuery::default()).unwrap();
        assert_eq!(summary.total_debits, 150.0);
        assert_eq!(summary.total_credits, 60.0);
        assert_eq!(summary.net, 90.0);

        let bank_only = service
            .summarize(LedgerEntryQuery {
                account: Some("Bank".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(bank_only.total_credits, 0.0);
        assert_eq!(bank_only.net, 150.0);
    }
}

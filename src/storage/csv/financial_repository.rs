//! CSV-backed financial record repository.
//!
//! All financial records live in one `financial.csv` at the base directory;
//! the flock column is left empty for records that apply to the operation
//! as a whole.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::{Reader, Writer};
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::sync::Arc;

use crate::domain::models::financial_record::{FinancialEntryType, FinancialRecord};
use crate::storage::traits::FinancialRecordStorage;

use super::connection::CsvConnection;

const HEADER: [&str; 8] = [
    "id",
    "flock_id",
    "record_date",
    "entry_type",
    "category",
    "amount",
    "description",
    "created_at",
];

/// CSV-based financial record repository
#[derive(Clone)]
pub struct FinancialRecordRepository {
    connection: Arc<CsvConnection>,
}

impl FinancialRecordRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn read_records(&self) -> Result<Vec<FinancialRecord>> {
        let file_path = self.connection.financial_csv_path();

        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            records.push(Self::parse_row(&row)?);
        }

        records.sort_by(|a, b| (a.record_date, a.created_at).cmp(&(b.record_date, b.created_at)));
        Ok(records)
    }

    fn parse_row(row: &csv::StringRecord) -> Result<FinancialRecord> {
        let get = |i: usize| row.get(i).unwrap_or("");

        let flock_id = match get(1) {
            "" => None,
            id => Some(id.to_string()),
        };
        let entry_type = FinancialEntryType::parse(get(3))
            .ok_or_else(|| anyhow!("Unknown financial entry type: {}", get(3)))?;

        Ok(FinancialRecord {
            id: get(0).to_string(),
            flock_id,
            record_date: NaiveDate::parse_from_str(get(2), "%Y-%m-%d")
                .context("Invalid record_date in financial.csv")?,
            entry_type,
            category: get(4).to_string(),
            amount: get(5).parse().unwrap_or(0.0),
            description: get(6).to_string(),
            created_at: chrono::DateTime::parse_from_rfc3339(get(7))
                .context("Invalid created_at in financial.csv")?
                .with_timezone(&chrono::Utc),
        })
    }

    fn write_records(&self, records: &[FinancialRecord]) -> Result<()> {
        let file_path = self.connection.financial_csv_path();

        let temp_path = file_path.with_extension("tmp");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let writer = BufWriter::new(file);
        let mut csv_writer = Writer::from_writer(writer);

        csv_writer.write_record(&HEADER)?;
        for record in records {
            let flock_id = record.flock_id.clone().unwrap_or_default();
            csv_writer.write_record(&[
                &record.id,
                &flock_id,
                &record.record_date.format("%Y-%m-%d").to_string(),
                &record.entry_type.as_str().to_string(),
                &record.category,
                &record.amount.to_string(),
                &record.description,
                &record.created_at.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        drop(csv_writer);
        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl FinancialRecordStorage for FinancialRecordRepository {
    fn store_record(&self, record: &FinancialRecord) -> Result<()> {
        info!("Storing financial record: {}", record.id);
        let mut records = self.read_records()?;
        records.push(record.clone());
        records.sort_by(|a, b| (a.record_date, a.created_at).cmp(&(b.record_date, b.created_at)));
        self.write_records(&records)
    }

    fn get_record(&self, record_id: &str) -> Result<Option<FinancialRecord>> {
        let records = self.read_records()?;
        Ok(records.into_iter().find(|r| r.id == record_id))
    }

    fn list_records(&self, flock_id: Option<&str>) -> Result<Vec<FinancialRecord>> {
        let mut records = self.read_records()?;
        if let Some(flock_id) = flock_id {
            records.retain(|r| r.flock_id.as_deref() == Some(flock_id));
        }
        Ok(records)
    }

    fn update_record(&self, record: &FinancialRecord) -> Result<()> {
        let mut records = self.read_records()?;
        let position = records
            .iter()
            .position(|r| r.id == record.id)
            .ok_or_else(|| anyhow!("Financial record not found: {}", record.id))?;
        records[position] = record.clone();
        self.write_records(&records)
    }

    fn delete_record(&self, record_id: &str) -> Result<bool> {
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|r| r.id != record_id);

        if records.len() == before {
            return Ok(false);
        }

        self.write_records(&records)?;
        info!("Deleted financial record: {}", record_id);
        Ok(true)
    }

    fn delete_records_for_flock(&self, flock_id: &str) -> Result<u32> {
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|r| r.flock_id.as_deref() != Some(flock_id));
        let removed = (before - records.len()) as u32;

        if removed > 0 {
            self.write_records(&records)?;
            info!(
                "Deleted {} financial records for flock {}",
                removed, flock_id
            );
        }
        Ok(removed)
    }
}

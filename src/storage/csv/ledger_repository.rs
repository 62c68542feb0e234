//! CSV-backed general ledger repository, a single append-oriented file.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::{Reader, Writer};
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::sync::Arc;

use crate::domain::models::ledger_entry::{LedgerEntry, LedgerEntryType};
use crate::storage::traits::LedgerStorage;

use super::connection::CsvConnection;

const HEADER: [&str; 7] = [
    "id",
    "entry_date",
    "account",
    "entry_type",
    "amount",
    "description",
    "created_at",
];

/// CSV-based ledger repository
#[derive(Clone)]
pub struct LedgerRepository {
    connection: Arc<CsvConnection>,
}

impl LedgerRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn read_entries(&self) -> Result<Vec<LedgerEntry>> {
        let file_path = self.connection.ledger_csv_path();

        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut entries = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            entries.push(Self::parse_row(&row)?);
        }

        entries.sort_by(|a, b| (a.entry_date, a.created_at).cmp(&(b.entry_date, b.created_at)));
        Ok(entries)
    }

    fn parse_row(row: &csv::StringRecord) -> Result<LedgerEntry> {
        let get = |i: usize| row.get(i).unwrap_or("");

        let entry_type = LedgerEntryType::parse(get(3))
            .ok_or_else(|| anyhow!("Unknown ledger entry type: {}", get(3)))?;

        Ok(LedgerEntry {
            id: get(0).to_string(),
            entry_date: NaiveDate::parse_from_str(get(1), "%Y-%m-%d")
                .context("Invalid entry_date in ledger.csv")?,
            account: get(2).to_string(),
            entry_type,
            amount: get(4).parse().unwrap_or(0.0),
            description: get(5).to_string(),
            created_at: chrono::DateTime::parse_from_rfc3339(get(6))
                .context("Invalid created_at in ledger.csv")?
                .with_timezone(&chrono::Utc),
        })
    }

    fn write_entries(&self, entries: &[LedgerEntry]) -> Result<()> {
        let file_path = self.connection.ledger_csv_path();

        let temp_path = file_path.with_extension("tmp");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let writer = BufWriter::new(file);
        let mut csv_writer = Writer::from_writer(writer);

        csv_writer.write_record(&HEADER)?;
        for entry in entries {
            csv_writer.write_record(&[
                &entry.id,
                &entry.entry_date.format("%Y-%m-%d").to_string(),
                &entry.account,
                &entry.entry_type.as_str().to_string(),
                &entry.amount.to_string(),
                &entry.description,
                &entry.created_at.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        drop(csv_writer);
        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl LedgerStorage for LedgerRepository {
    fn store_entry(&self, entry: &LedgerEntry) -> Result<()> {
        info!("Storing ledger entry: {}", entry.id);
        let mut entries = self.read_entries()?;
        entries.push(entry.clone());
        entries.sort_by(|a, b| (a.entry_date, a.created_at).cmp(&(b.entry_date, b.created_at)));
        self.write_entries(&entries)
    }

    fn list_entries(&self) -> Result<Vec<LedgerEntry>> {
        self.read_entries()
    }
}

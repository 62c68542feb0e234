//! CSV-backed daily record repository, one `daily.csv` per flock.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::{Reader, Writer};
use log::{info, warn};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::sync::Arc;

use crate::domain::models::daily_record::DailyRecord;
use crate::storage::traits::{ChainUpdate, DailyRecordStorage};

use super::connection::CsvConnection;

const HEADER: [&str; 16] = [
    "id",
    "flock_id",
    "record_date",
    "age_days",
    "opening_birds",
    "mortality",
    "birds_sold",
    "birds_sold_kg",
    "selling_price_per_kg",
    "feed_type",
    "feed_cost_per_kg",
    "current_feed_kg",
    "avg_weight_grams",
    "closing_birds",
    "remarks",
    "created_at",
];

/// CSV-based daily record repository
#[derive(Clone)]
pub struct DailyRecordRepository {
    connection: Arc<CsvConnection>,
}

impl DailyRecordRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    /// Read all daily records of a flock, chronological with same-day ties
    /// broken by creation time
    fn read_records(&self, flock_id: &str) -> Result<Vec<DailyRecord>> {
        let file_path = self.connection.daily_csv_path(flock_id);

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

    fn parse_row(row: &csv::StringRecord) -> Result<DailyRecord> {
        let get = |i: usize| row.get(i).unwrap_or("");

        Ok(DailyRecord {
            id: get(0).to_string(),
            flock_id: get(1).to_string(),
            record_date: NaiveDate::parse_from_str(get(2), "%Y-%m-%d")
                .context("Invalid record_date in daily.csv")?,
            age_days: get(3).parse().unwrap_or(0),
            opening_birds: get(4).parse().unwrap_or(0),
            mortality: get(5).parse().unwrap_or(0),
            birds_sold: get(6).parse().unwrap_or(0),
            birds_sold_kg: get(7).parse().unwrap_or(0.0),
            selling_price_per_kg: get(8).parse().unwrap_or(0.0),
            feed_type: get(9).to_string(),
            feed_cost_per_kg: get(10).parse().unwrap_or(0.0),
            current_feed_kg: get(11).parse().unwrap_or(0.0),
            avg_weight_grams: get(12).parse().unwrap_or(0.0),
            closing_birds: get(13).parse().unwrap_or(0),
            remarks: get(14).to_string(),
            created_at: chrono::DateTime::parse_from_rfc3339(get(15))
                .context("Invalid created_at in daily.csv")?
                .with_timezone(&chrono::Utc),
        })
    }

    /// Rewrite a flock's whole daily file through a temp file rename
    fn write_records(&self, flock_id: &str, records: &[DailyRecord]) -> Result<()> {
        let file_path = self.connection.daily_csv_path(flock_id);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

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
            csv_writer.write_record(&[
                &record.id,
                &record.flock_id,
                &record.record_date.format("%Y-%m-%d").to_string(),
                &record.age_days.to_string(),
                &record.opening_birds.to_string(),
                &record.mortality.to_string(),
                &record.birds_sold.to_string(),
                &record.birds_sold_kg.to_string(),
                &record.selling_price_per_kg.to_string(),
                &record.feed_type,
                &record.feed_cost_per_kg.to_string(),
                &record.current_feed_kg.to_string(),
                &record.avg_weight_grams.to_string(),
                &record.closing_birds.to_string(),
                &record.remarks,
                &record.created_at.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        drop(csv_writer);
        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl DailyRecordStorage for DailyRecordRepository {
    fn store_record(&self, record: &DailyRecord) -> Result<()> {
        info!(
            "Storing daily record {} for flock {}",
            record.id, record.flock_id
        );
        let mut records = self.read_records(&record.flock_id)?;
        records.push(record.clone());
        records.sort_by(|a, b| (a.record_date, a.created_at).cmp(&(b.record_date, b.created_at)));
        self.write_records(&record.flock_id, &records)
    }

    fn get_record(&self, flock_id: &str, record_id: &str) -> Result<Option<DailyRecord>> {
        let records = self.read_records(flock_id)?;
        Ok(records.into_iter().find(|r| r.id == record_id))
    }

    fn list_records(&self, flock_id: &str) -> Result<Vec<DailyRecord>> {
        self.read_records(flock_id)
    }

    fn get_latest_record(&self, flock_id: &str) -> Result<Option<DailyRecord>> {
        // read_records sorts chronologically, so the latest is the last
        Ok(self.read_records(flock_id)?.into_iter().last())
    }

    fn get_records_since(&self, flock_id: &str, date: NaiveDate) -> Result<Vec<DailyRecord>> {
        let mut records = self.read_records(flock_id)?;
        records.retain(|r| r.record_date >= date);
        Ok(records)
    }

    fn get_latest_record_before_date(
        &self,
        flock_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>> {
        Ok(self
            .read_records(flock_id)?
            .into_iter()
            .filter(|r| r.record_date < date)
            .last())
    }

    fn update_record(&self, record: &DailyRecord) -> Result<()> {
        let mut records = self.read_records(&record.flock_id)?;
        let position = records
            .iter()
            .position(|r| r.id == record.id)
            .ok_or_else(|| anyhow!("Daily record not found: {}", record.id))?;
        records[position] = record.clone();
        records.sort_by(|a, b| (a.record_date, a.created_at).cmp(&(b.record_date, b.created_at)));
        self.write_records(&record.flock_id, &records)
    }

    fn delete_record(&self, flock_id: &str, record_id: &str) -> Result<bool> {
        let mut records = self.read_records(flock_id)?;
        let before = records.len();
        records.retain(|r| r.id != record_id);

        if records.len() == before {
            return Ok(false);
        }

        self.write_records(flock_id, &records)?;
        info!("Deleted daily record {} from flock {}", record_id, flock_id);
        Ok(true)
    }

    fn update_chain_fields(&self, flock_id: &str, updates: &[ChainUpdate]) -> Result<()> {
        let mut records = self.read_records(flock_id)?;

        for update in updates {
            match records.iter_mut().find(|r| r.id == update.record_id) {
                Some(record) => {
                    record.age_days = update.age_days;
                    record.opening_birds = update.opening_birds;
                    record.closing_birds = update.closing_birds;
                }
                None => {
                    warn!(
                        "Chain update for unknown daily record {} in flock {}",
                        update.record_id, flock_id
                    );
                }
            }
        }

        self.write_records(flock_id, &records)
    }

    fn delete_all_records(&self, flock_id: &str) -> Result<u32> {
        let records = self.read_records(flock_id)?;
        let count = records.len() as u32;

        let file_path = self.connection.daily_csv_path(flock_id);
        if file_path.exists() {
            std::fs::remove_file(&file_path)?;
            info!("Deleted {} daily records for flock {}", count, flock_id);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::test_connection;
    use chrono::{TimeZone, Utc};

    fn sample_record(id: &str, day: u32, created_hour: u32) -> DailyRecord {
        DailyRecord {
            id: id.to_string(),
            flock_id: "fl-1".to_string(),
            record_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            age_days: 0,
            opening_birds: 0,
            mortality: 1,
            birds_sold: 0,
            birds_sold_kg: 0.0,
            selling_price_per_kg: 0.0,
            feed_type: "Starter".to_string(),
            feed_cost_per_kg: 40.0,
            current_feed_kg: 12.5,
            avg_weight_grams: 350.0,
            closing_birds: 0,
            remarks: "routine, nothing unusual".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 6, day, created_hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let (connection, _temp_dir) = test_connection();
        let repository = DailyRecordRepository::new(connection);

        let record = sample_record("dr-1", 3, 18);
        repository.store_record(&record).unwrap();

        let loaded = repository.get_record("fl-1", "dr-1").unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_records_come_back_in_date_order() {
        let (connection, _temp_dir) = test_connection();
        let repository = DailyRecordRepository::new(connection);

        repository.store_record(&sample_record("dr-c", 5, 18)).unwrap();
        repository.store_record(&sample_record("dr-a", 3, 18)).unwrap();
        repository.store_record(&sample_record("dr-b", 4, 18)).unwrap();

        let records = repository.list_records("fl-1").unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["dr-a", "dr-b", "dr-c"]);

        let latest = repository.get_latest_record("fl-1").unwrap().unwrap();
        assert_eq!(latest.id, "dr-c");
    }

    #[test]
    fn test_since_and_before_queries() {
        let (connection, _temp_dir) = test_connection();
        let repository = DailyRecordRepository::new(connection);

        repository.store_record(&sample_record("dr-a", 3, 18)).unwrap();
        repository.store_record(&sample_record("dr-b", 4, 18)).unwrap();
        repository.store_record(&sample_record("dr-c", 5, 18)).unwrap();

        let cutoff = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let since = repository.get_records_since("fl-1", cutoff).unwrap();
        assert_eq!(since.len(), 2);
        assert_eq!(since[0].id, "dr-b");

        let before = repository
            .get_latest_record_before_date("fl-1", cutoff)
            .unwrap()
            .unwrap();
        assert_eq!(before.id, "dr-a");
    }

    #[test]
    fn test_delete_all_reports_count() {
        let (connection, _temp_dir) = test_connection();
        let repository = DailyRecordRepository::new(connection);

        repository.store_record(&sample_record("dr-a", 3, 18)).unwrap();
        repository.store_record(&sample_record("dr-b", 4, 18)).unwrap();

        assert_eq!(repository.delete_all_records("fl-1").unwrap(), 2);
        assert!(repository.list_records("fl-1").unwrap().is_empty());
    }
}

//! Filesystem connection shared by the CSV repositories.

use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::traits::Connection;

use super::daily_repository::DailyRecordRepository;

/// Handle on the data directory. Cloning is cheap; every repository holds
/// one and derives its file paths from it.
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Open (and create if needed) the data directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        fs::create_dir_all(&base_directory)?;
        info!("CSV storage initialized at {:?}", base_directory);
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Directory that holds one flock directory per flock
    pub fn flocks_directory(&self) -> PathBuf {
        self.base_directory.join("flocks")
    }

    /// Directory holding one flock's metadata and daily records
    pub fn flock_directory(&self, flock_id: &str) -> PathBuf {
        self.flocks_directory().join(flock_id)
    }

    pub fn flock_yaml_path(&self, flock_id: &str) -> PathBuf {
        self.flock_directory(flock_id).join("flock.yaml")
    }

    pub fn daily_csv_path(&self, flock_id: &str) -> PathBuf {
        self.flock_directory(flock_id).join("daily.csv")
    }

    pub fn financial_csv_path(&self) -> PathBuf {
        self.base_directory.join("financial.csv")
    }

    pub fn ledger_csv_path(&self) -> PathBuf {
        self.base_directory.join("ledger.csv")
    }
}

impl Connection for CsvConnection {
    type DailyRecordRepository = DailyRecordRepository;

    fn create_daily_record_repository(&self) -> Self::DailyRecordRepository {
        DailyRecordRepository::new(std::sync::Arc::new(self.clone()))
    }
}

//! Flock service domain logic for the poultry ledger.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::flocks::{
    CreateFlockCommand, CreateFlockResult, DeleteFlockCommand, DeleteFlockResult, GetFlockCommand,
    GetFlockResult, ListFlocksResult, UpdateFlockCommand, UpdateFlockResult,
};
use crate::domain::models::flock::Flock;
use crate::storage::csv::{CsvConnection, DailyRecordRepository, FinancialRecordRepository, FlockRepository};
use crate::storage::traits::{DailyRecordStorage, FinancialRecordStorage, FlockStorage};

/// Service for managing flocks
#[derive(Clone)]
pub struct FlockService {
    flock_repository: FlockRepository,
    daily_repository: DailyRecordRepository,
    financial_repository: FinancialRecordRepository,
}

impl FlockService {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            flock_repository: FlockRepository::new(connection.clone()),
            daily_repository: DailyRecordRepository::new(connection.clone()),
            financial_repository: FinancialRecordRepository::new(connection),
        }
    }

    /// Create a new flock
    pub fn create_flock(&self, command: CreateFlockCommand) -> Result<CreateFlockResult> {
        info!(
            "Creating flock: breed={}, arrival={}",
            command.breed, command.arrival_date
        );

        if command.breed.trim().is_empty() {
            return Err(anyhow!("Breed is required"));
        }
        if command.initial_chicks == 0 {
            return Err(anyhow!("Initial chick count must be at least 1"));
        }
        if command.price_per_chick < 0.0 {
            return Err(anyhow!("Price per chick cannot be negative"));
        }

        let now = Utc::now();
        let arrival_date = NaiveDate::parse_from_str(&command.arrival_date, "%Y-%m-%d")
            .context("Invalid arrival date format in create_flock command")?;

        let flock = Flock {
            id: Flock::generate_id(now.timestamp_millis() as u64),
            breed: command.breed.trim().to_string(),
            arrival_date,
            initial_chicks: command.initial_chicks,
            extra_chicks: command.extra_chicks,
            price_per_chick: command.price_per_chick,
            created_at: now,
            updated_at: now,
        };

        self.flock_repository.store_flock(&flock)?;

        info!("Created flock {} ({})", flock.id, flock.breed);
        Ok(CreateFlockResult { flock })
    }

    /// Get a flock by ID
    pub fn get_flock(&self, command: GetFlockCommand) -> Result<GetFlockResult> {
        let flock = self.flock_repository.get_flock(&command.flock_id)?;

        if flock.is_none() {
            warn!("Flock not found: {}", command.flock_id);
        }

        Ok(GetFlockResult { flock })
    }

    /// List all flocks, most recently created first
    pub fn list_flocks(&self) -> Result<ListFlocksResult> {
        let flocks = self.flock_repository.list_flocks()?;
        info!("Found {} flocks", flocks.len());
        Ok(ListFlocksResult { flocks })
    }

    /// Update an existing flock in place
    pub fn update_flock(&self, command: UpdateFlockCommand) -> Result<UpdateFlockResult> {
        info!("Updating flock: {}", command.flock_id);

        let mut flock = self
            .flock_repository
            .get_flock(&command.flock_id)?
            .ok_or_else(|| anyhow!("Flock not found: {}", command.flock_id))?;

        if let Some(breed) = command.breed {
            if breed.trim().is_empty() {
                return Err(anyhow!("Breed is required"));
            }
            flock.breed = breed.trim().to_string();
        }
        if let Some(arrival_date) = command.arrival_date {
            flock.arrival_date = NaiveDate::parse_from_str(&arrival_date, "%Y-%m-%d")
                .context("Invalid arrival date format in update_flock command")?;
        }
        if let Some(initial_chicks) = command.initial_chicks {
            if initial_chicks == 0 {
                return Err(anyhow!("Initial chick count must be at least 1"));
            }
            flock.initial_chicks = initial_chicks;
        }
        if let Some(extra_chicks) = command.extra_chicks {
            flock.extra_chicks = extra_chicks;
        }
        if let Some(price_per_chick) = command.price_per_chick {
            if price_per_chick < 0.0 {
                return Err(anyhow!("Price per chick cannot be negative"));
            }
            flock.price_per_chick = price_per_chick;
        }

        flock.updated_at = Utc::now();
        self.flock_repository.update_flock(&flock)?;

        info!("Updated flock {} ({})", flock.id, flock.breed);
        Ok(UpdateFlockResult { flock })
    }

    /// Delete a flock and everything that references it.
    ///
    /// Daily and financial records are removed first so a failure partway
    /// through never leaves children pointing at a missing flock.
    pub fn delete_flock(&self, command: DeleteFlockCommand) -> Result<DeleteFlockResult> {
        info!(
            "Deleting flock {} and all dependent records",
            command.flock_id
        );

        let flock = self
            .flock_repository
            .get_flock(&command.flock_id)?
            .ok_or_else(|| anyhow!("Flock not found: {}", command.flock_id))?;

        let deleted_daily_records = self.daily_repository.delete_all_records(&command.flock_id)?;
        let deleted_financial_records = self
            .financial_repository
            .delete_records_for_flock(&command.flock_id)?;
        self.flock_repository.delete_flock(&command.flock_id)?;

        info!(
            "Deleted flock {} with {} daily and {} financial records",
            command.flock_id, deleted_daily_records, deleted_financial_records
        );

        Ok(DeleteFlockResult {
            success_message: format!(
                "Flock '{}' deleted with {} daily and {} financial records",
                flock.breed, deleted_daily_records, deleted_financial_records
            ),
            deleted_daily_records,
            deleted_financial_records,
        })
    }
}

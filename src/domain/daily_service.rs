//! Daily record service domain logic for the poultry ledger.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::daily::{
    CreateDailyRecordCommand, CreateDailyRecordResult, DailyRecordListQuery, DailyRecordListResult,
    DeleteDailyRecordCommand, DeleteDailyRecordResult, UpdateDailyRecordCommand,
    UpdateDailyRecordResult,
};
use crate::domain::headcount_service::{refold_chain, HeadcountService};
use crate::domain::models::daily_record::DailyRecord;
use crate::domain::models::flock::Flock;
use crate::domain::rollup::{compute_next_daily_record, DailyInput};
use crate::storage::csv::{CsvConnection, DailyRecordRepository, FlockRepository};
use crate::storage::traits::{DailyRecordStorage, FlockStorage};

/// Service for managing the daily records of a flock
#[derive(Clone)]
pub struct DailyRecordService {
    daily_repository: DailyRecordRepository,
    flock_repository: FlockRepository,
    headcount_service: HeadcountService<CsvConnection>,
}

impl DailyRecordService {
    pub fn new(
        connection: Arc<CsvConnection>,
        headcount_service: HeadcountService<CsvConnection>,
    ) -> Self {
        Self {
            daily_repository: DailyRecordRepository::new(connection.clone()),
            flock_repository: FlockRepository::new(connection),
            headcount_service,
        }
    }

    /// Create a daily record, deriving its chain figures from the record it
    /// will follow.
    ///
    /// A backdated entry is dry-run against the whole chain first, so an
    /// entry that would starve a later day of birds is rejected before
    /// anything is written; afterwards the downstream records are
    /// recalculated.
    pub fn create_daily_record(
        &self,
        command: CreateDailyRecordCommand,
    ) -> Result<CreateDailyRecordResult> {
        info!(
            "Creating daily record for flock {} on {}",
            command.flock_id, command.record_date
        );

        let record_date = NaiveDate::parse_from_str(&command.record_date, "%Y-%m-%d")
            .context("Invalid record date format in create_daily_record command")?;
        let flock = self.require_flock(&command.flock_id)?;

        let latest = self.daily_repository.get_latest_record(&flock.id)?;
        let backdated = latest
            .as_ref()
            .map_or(false, |last| last.record_date > record_date);
        let prior = if backdated {
            // chain from the record this entry will actually follow
            self.daily_repository
                .list_records(&flock.id)?
                .into_iter()
                .filter(|r| r.record_date <= record_date)
                .last()
        } else {
            latest
        };

        let input = DailyInput {
            record_date,
            feed_type: command.feed_type,
            feed_cost_per_kg: command.feed_cost_per_kg,
            current_feed_kg: command.current_feed_kg,
            avg_weight_grams: command.avg_weight_grams,
            mortality: command.mortality,
            birds_sold: command.birds_sold,
            birds_sold_kg: command.birds_sold_kg,
            selling_price_per_kg: command.selling_price_per_kg,
            remarks: command.remarks,
        };

        let now = Utc::now();
        let record = compute_next_daily_record(
            &flock,
            prior.as_ref(),
            input,
            DailyRecord::generate_id(now.timestamp_millis() as u64),
            now,
        )?;

        if backdated {
            let mut candidate = self.daily_repository.list_records(&flock.id)?;
            candidate.push(record.clone());
            candidate
                .sort_by(|a, b| (a.record_date, a.created_at).cmp(&(b.record_date, b.created_at)));
            refold_chain(&flock, &candidate)?;
        }

        self.daily_repository.store_record(&record)?;

        let recalculated = if backdated {
            self.headcount_service
                .recalculate_chain_from_date(&flock, record.record_date)?
        } else {
            0
        };

        let record = if recalculated > 0 {
            self.daily_repository
                .get_record(&flock.id, &record.id)?
                .ok_or_else(|| anyhow!("Daily record not found after recalculation: {}", record.id))?
        } else {
            record
        };

        info!(
            "Created daily record {} (day {}, closing {})",
            record.id, record.age_days, record.closing_birds
        );
        Ok(CreateDailyRecordResult {
            record,
            recalculated,
        })
    }

    /// List a flock's daily records in chronological order
    pub fn list_daily_records(&self, query: DailyRecordListQuery) -> Result<DailyRecordListResult> {
        self.require_flock(&query.flock_id)?;
        let records = self.daily_repository.list_records(&query.flock_id)?;
        Ok(DailyRecordListResult { records })
    }

    /// Update a daily record's entered fields.
    ///
    /// The whole chain is refolded with the edited record in place before
    /// anything is persisted; an edit that would drive any later day's
    /// closing count negative is rejected whole. On success the edited
    /// record and every stale downstream record are rewritten.
    pub fn update_daily_record(
        &self,
        command: UpdateDailyRecordCommand,
    ) -> Result<UpdateDailyRecordResult> {
        info!(
            "Updating daily record {} in flock {}",
            command.record_id, command.flock_id
        );

        let flock = self.require_flock(&command.flock_id)?;
        let existing = self
            .daily_repository
            .get_record(&command.flock_id, &command.record_id)?
            .ok_or_else(|| anyhow!("Daily record not found: {}", command.record_id))?;

        let mut updated = existing.clone();
        if let Some(record_date) = &command.record_date {
            updated.record_date = NaiveDate::parse_from_str(record_date, "%Y-%m-%d")
                .context("Invalid record date format in update_daily_record command")?;
        }
        if let Some(feed_type) = command.feed_type {
            updated.feed_type = feed_type;
        }
        if let Some(feed_cost_per_kg) = command.feed_cost_per_kg {
            updated.feed_cost_per_kg = feed_cost_per_kg;
        }
        if let Some(current_feed_kg) = command.current_feed_kg {
            updated.current_feed_kg = current_feed_kg;
        }
        if let Some(avg_weight_grams) = command.avg_weight_grams {
            updated.avg_weight_grams = avg_weight_grams;
        }
        if let Some(mortality) = command.mortality {
            updated.mortality = mortality;
        }
        if let Some(birds_sold) = command.birds_sold {
            updated.birds_sold = birds_sold;
        }
        if let Some(birds_sold_kg) = command.birds_sold_kg {
            updated.birds_sold_kg = birds_sold_kg;
        }
        if let Some(selling_price_per_kg) = command.selling_price_per_kg {
            updated.selling_price_per_kg = selling_price_per_kg;
        }
        if let Some(remarks) = command.remarks {
            updated.remarks = remarks;
        }

        // Dry-run the refold before touching storage
        let mut candidate: Vec<DailyRecord> = self
            .daily_repository
            .list_records(&command.flock_id)?
            .into_iter()
            .map(|r| if r.id == updated.id { updated.clone() } else { r })
            .collect();
        candidate.sort_by(|a, b| (a.record_date, a.created_at).cmp(&(b.record_date, b.created_at)));
        let folded = refold_chain(&flock, &candidate)?;

        // Carry the refolded figures onto the edited record before persisting
        if let Some(chain) = folded.iter().find(|c| c.record_id == updated.id) {
            updated.age_days = chain.age_days;
            updated.opening_birds = chain.opening_birds;
            updated.closing_birds = chain.closing_birds;
        }
        self.daily_repository.update_record(&updated)?;

        let from_date = existing.record_date.min(updated.record_date);
        let recalculated = self
            .headcount_service
            .recalculate_chain_from_date(&flock, from_date)?;

        info!(
            "Updated daily record {} ({} downstream rewrites)",
            updated.id, recalculated
        );
        Ok(UpdateDailyRecordResult {
            record: updated,
            recalculated,
        })
    }

    /// Delete a daily record and repair the chain behind it
    pub fn delete_daily_record(
        &self,
        command: DeleteDailyRecordCommand,
    ) -> Result<DeleteDailyRecordResult> {
        let flock = self.require_flock(&command.flock_id)?;
        let record = self
            .daily_repository
            .get_record(&command.flock_id, &command.record_id)?
            .ok_or_else(|| anyhow!("Daily record not found: {}", command.record_id))?;

        self.daily_repository
            .delete_record(&command.flock_id, &command.record_id)?;

        let recalculated = self
            .headcount_service
            .recalculate_chain_from_date(&flock, record.record_date)?;

        info!(
            "Deleted daily record {} ({} downstream rewrites)",
            command.record_id, recalculated
        );
        Ok(DeleteDailyRecordResult {
            success_message: format!("Daily record for {} deleted", record.record_date),
            recalculated,
        })
    }

    fn require_flock(&self, flock_id: &str) -> Result<Flock> {
        self.flock_repository
            .get_flock(flock_id)?
            .ok_or_else(|| anyhow!("Flock not found: {}", flock_id))
    }
}

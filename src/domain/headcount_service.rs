//! Headcount chain maintenance for daily records.
//!
//! Opening count and age are derived from the preceding record at entry
//! time, so a backdated insert, an edit or a delete leaves later records
//! stale. This service refolds the chain over the ordered history and
//! rewrites the records whose derived figures changed.

use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::models::daily_record::DailyRecord;
use crate::domain::models::flock::Flock;
use crate::domain::rollup::{closing_count, ValidationError};
use crate::storage::{ChainUpdate, Connection, DailyRecordStorage};

/// Recompute chain figures for a full, chronologically ordered record set.
///
/// Pure dry run over the proposed records: returns what every record's
/// age/opening/closing would be, or fails on the first day whose closing
/// count would go negative, without touching storage. Callers use this to
/// reject an edit or backdated insert before anything is written.
pub fn refold_chain(
    flock: &Flock,
    records: &[DailyRecord],
) -> Result<Vec<ChainUpdate>, ValidationError> {
    let mut running_count = flock.chicks_in();
    let mut age = 0u32;
    let mut folded = Vec::with_capacity(records.len());

    for record in records {
        age += 1;
        let opening = running_count;
        let closing = closing_count(opening, record.mortality, record.birds_sold)?;
        folded.push(ChainUpdate {
            record_id: record.id.clone(),
            age_days: age,
            opening_birds: opening,
            closing_birds: closing,
        });
        running_count = closing;
    }

    Ok(folded)
}

/// Service responsible for headcount chain recalculation and validation
#[derive(Clone)]
pub struct HeadcountService<C: Connection> {
    daily_repository: C::DailyRecordRepository,
}

impl<C: Connection> HeadcountService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let daily_repository = connection.create_daily_record_repository();
        Self { daily_repository }
    }

    /// Recalculate age, opening and closing counts from a date forward.
    ///
    /// The algorithm:
    /// 1. Seed the chain from the last record before `from_date` (or the
    ///    flock's chicks-in when there is none)
    /// 2. Refold the ordered records on or after `from_date`
    /// 3. Rewrite every record whose derived figures changed
    ///
    /// Fails without writing when any day's closing count would go
    /// negative. Returns the number of records rewritten.
    pub fn recalculate_chain_from_date(&self, flock: &Flock, from_date: NaiveDate) -> Result<usize> {
        info!(
            "Recalculating headcount chain for flock {} from {}",
            flock.id, from_date
        );

        let records = self.daily_repository.get_records_since(&flock.id, from_date)?;
        if records.is_empty() {
            info!(
                "No daily records on or after {}, no recalculation needed",
                from_date
            );
            return Ok(0);
        }

        let (mut running_count, mut age) = self.chain_seed(flock, from_date)?;
        info!(
            "Chain seed for recalculation: {} birds, day {}",
            running_count, age
        );

        let mut updates = Vec::new();
        for record in &records {
            age += 1;
            let opening = running_count;
            let closing = closing_count(opening, record.mortality, record.birds_sold)?;
            if record.age_days != age
                || record.opening_birds != opening
                || record.closing_birds != closing
            {
                updates.push(ChainUpdate {
                    record_id: record.id.clone(),
                    age_days: age,
                    opening_birds: opening,
                    closing_birds: closing,
                });
            }
            running_count = closing;
        }

        if updates.is_empty() {
            info!("Chain already consistent for flock {}", flock.id);
            return Ok(0);
        }

        self.daily_repository
            .update_chain_fields(&flock.id, &updates)?;

        info!(
            "Rewrote {} daily records in flock {}",
            updates.len(),
            flock.id
        );
        Ok(updates.len())
    }

    /// Chain state just before a date: closing count and age of the latest
    /// prior record, or the flock's starting figures when there is none
    fn chain_seed(&self, flock: &Flock, from_date: NaiveDate) -> Result<(u32, u32)> {
        match self
            .daily_repository
            .get_latest_record_before_date(&flock.id, from_date)?
        {
            Some(record) => Ok((record.closing_birds, record.age_days)),
            None => Ok((flock.chicks_in(), 0)),
        }
    }

    /// Validate that a flock's stored chain is internally consistent.
    /// This is a diagnostic method; it reports violations without fixing
    /// anything.
    pub fn validate_chain(&self, flock: &Flock) -> Result<Vec<String>> {
        let records = self.daily_repository.list_records(&flock.id)?;

        let mut errors = Vec::new();
        let mut expected_count = flock.chicks_in() as i64;
        let mut expected_age = 0u32;

        for record in &records {
            expected_age += 1;
            if record.age_days != expected_age {
                errors.push(format!(
                    "Record {} has age {} but the chain expects {}",
                    record.id, record.age_days, expected_age
                ));
            }
            if record.opening_birds as i64 != expected_count {
                errors.push(format!(
                    "Record {} has opening count {} but the chain expects {}",
                    record.id, record.opening_birds, expected_count
                ));
            }
            expected_count -= record.mortality as i64 + record.birds_sold as i64;
            if record.closing_birds as i64 != expected_count {
                errors.push(format!(
                    "Record {} has closing count {} but the chain expects {}",
                    record.id, record.closing_birds, expected_count
                ));
            }
        }

        if errors.is_empty() {
            info!("Headcount chain is consistent for flock {}", flock.id);
        } else {
            warn!(
                "Found {} chain violations for flock {}",
                errors.len(),
                flock.id
            );
        }

        Ok(errors)
    }
}

//! Domain model for a flock.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::random_suffix;

/// A cohort of birds raised together, from arrival to disposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flock {
    pub id: String,
    pub breed: String,
    pub arrival_date: NaiveDate,
    /// Birds present on arrival, at least 1
    pub initial_chicks: u32,
    /// Birds added after arrival
    pub extra_chicks: u32,
    pub price_per_chick: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flock {
    /// Total birds that entered the flock (initial + extra).
    pub fn chicks_in(&self) -> u32 {
        self.initial_chicks + self.extra_chicks
    }

    /// Generate a unique flock ID from a millisecond timestamp.
    /// Format: fl-<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("fl-{}-{}", timestamp_ms, random_suffix(4))
    }
}

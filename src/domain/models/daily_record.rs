//! Domain model for one day's operational log of a flock.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::random_suffix;

/// One day's entry for exactly one flock.
///
/// `age_days`, `opening_birds` and `closing_birds` are derived from the
/// preceding record (or the flock itself for the first entry) and rewritten
/// by chain recalculation; the remaining fields are user-entered facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: String,
    pub flock_id: String,
    pub record_date: NaiveDate,
    pub age_days: u32,
    pub opening_birds: u32,
    pub mortality: u32,
    pub birds_sold: u32,
    /// Live weight sold, kilograms
    pub birds_sold_kg: f64,
    pub selling_price_per_kg: f64,
    pub feed_type: String,
    pub feed_cost_per_kg: f64,
    /// Feed consumed this day, kilograms
    pub current_feed_kg: f64,
    /// Average bird weight, grams
    pub avg_weight_grams: f64,
    pub closing_birds: u32,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
}

impl DailyRecord {
    /// Generate a unique daily record ID from a millisecond timestamp.
    /// Format: dr-<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("dr-{}-{}", timestamp_ms, random_suffix(4))
    }
}

//! Flock rollup engine: headcount chaining and lifetime financial summary.
//!
//! Both operations here are pure functions over externally supplied records.
//! Fetching the inputs and persisting the outputs is the caller's job, and
//! callers must serialize record creation per flock to keep the
//! opening/closing chain consistent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::daily_record::DailyRecord;
use crate::domain::models::financial_record::{FinancialEntryType, FinancialRecord};
use crate::domain::models::flock::Flock;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "closing birds would be negative: opening {opening}, mortality {mortality}, sold {sold}"
    )]
    NegativeClosingCount {
        opening: u32,
        mortality: u32,
        sold: u32,
    },
}

/// User-entered fields for one day's entry. Opening count, age and closing
/// count are derived, never supplied.
#[derive(Debug, Clone)]
pub struct DailyInput {
    pub record_date: NaiveDate,
    pub feed_type: String,
    pub feed_cost_per_kg: f64,
    pub current_feed_kg: f64,
    pub avg_weight_grams: f64,
    pub mortality: u32,
    pub birds_sold: u32,
    pub birds_sold_kg: f64,
    pub selling_price_per_kg: f64,
    pub remarks: String,
}

/// Closing headcount for a single day.
///
/// Mortality and sales are independent counts subtracted in one step; there
/// is no within-day ordering between the two.
pub fn closing_count(opening: u32, mortality: u32, sold: u32) -> Result<u32, ValidationError> {
    (opening as i64 - mortality as i64 - sold as i64)
        .try_into()
        .map_err(|_| ValidationError::NegativeClosingCount {
            opening,
            mortality,
            sold,
        })
}

/// Derive the next daily record in a flock's chain.
///
/// Opening count and age come from the most recent prior record when one
/// exists, otherwise from the flock itself. Fails without constructing
/// anything when the day's mortality and sales would exceed the opening
/// count; the caller persists nothing in that case.
pub fn compute_next_daily_record(
    flock: &Flock,
    prior: Option<&DailyRecord>,
    input: DailyInput,
    record_id: String,
    created_at: DateTime<Utc>,
) -> Result<DailyRecord, ValidationError> {
    let (opening_birds, age_days) = match prior {
        Some(last) => (last.closing_birds, last.age_days + 1),
        None => (flock.chicks_in(), 1),
    };
    let closing_birds = closing_count(opening_birds, input.mortality, input.birds_sold)?;

    Ok(DailyRecord {
        id: record_id,
        flock_id: flock.id.clone(),
        record_date: input.record_date,
        age_days,
        opening_birds,
        mortality: input.mortality,
        birds_sold: input.birds_sold,
        birds_sold_kg: input.birds_sold_kg,
        selling_price_per_kg: input.selling_price_per_kg,
        feed_type: input.feed_type,
        feed_cost_per_kg: input.feed_cost_per_kg,
        current_feed_kg: input.current_feed_kg,
        avg_weight_grams: input.avg_weight_grams,
        closing_birds,
        remarks: input.remarks,
        created_at,
    })
}

/// Aggregated lifetime figures for a flock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub chicks_in: u32,
    pub mortality_total: u32,
    pub sold_birds_total: u32,
    pub sold_kg_total: f64,
    pub feed_kg_total: f64,
    pub feed_cost_total: f64,
    pub sale_income_total: f64,
    pub other_income_total: f64,
    pub chick_cost_total: f64,
    pub other_expenses_total: f64,
    pub income_total: f64,
    pub expense_total: f64,
    pub profit: f64,
}

impl ReportSummary {
    /// Round every monetary and kilogram figure to two decimals.
    ///
    /// Internal accumulation stays at full precision; call this at the
    /// presentation boundary only.
    pub fn rounded(&self) -> Self {
        Self {
            chicks_in: self.chicks_in,
            mortality_total: self.mortality_total,
            sold_birds_total: self.sold_birds_total,
            sold_kg_total: round2(self.sold_kg_total),
            feed_kg_total: round2(self.feed_kg_total),
            feed_cost_total: round2(self.feed_cost_total),
            sale_income_total: round2(self.sale_income_total),
            other_income_total: round2(self.other_income_total),
            chick_cost_total: round2(self.chick_cost_total),
            other_expenses_total: round2(self.other_expenses_total),
            income_total: round2(self.income_total),
            expense_total: round2(self.expense_total),
            profit: round2(self.profit),
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fold a flock's full history into its lifetime summary.
///
/// The fold is commutative, so record order does not matter, and missing
/// records simply contribute zero to each total. Feed cost and sale income
/// are recomputed from each record's own figures rather than read from a
/// stored total, so a later correction to a record's price retroactively
/// changes the rollup.
pub fn aggregate_flock_report(
    flock: &Flock,
    daily_records: &[DailyRecord],
    financial_records: &[FinancialRecord],
) -> ReportSummary {
    let mut mortality_total = 0u32;
    let mut sold_birds_total = 0u32;
    let mut sold_kg_total = 0.0;
    let mut feed_kg_total = 0.0;
    let mut feed_cost_total = 0.0;
    let mut sale_income_total = 0.0;

    for record in daily_records {
        mortality_total += record.mortality;
        sold_birds_total += record.birds_sold;
        sold_kg_total += record.birds_sold_kg;
        feed_kg_total += record.current_feed_kg;
        feed_cost_total += record.current_feed_kg * record.feed_cost_per_kg;
        sale_income_total += record.birds_sold_kg * record.selling_price_per_kg;
    }

    let mut other_expenses_total = 0.0;
    let mut other_income_total = 0.0;
    for record in financial_records {
        match record.entry_type {
            FinancialEntryType::Expense => other_expenses_total += record.amount,
            FinancialEntryType::Income => other_income_total += record.amount,
        }
    }

    let chicks_in = flock.chicks_in();
    let chick_cost_total = chicks_in as f64 * flock.price_per_chick;
    let income_total = sale_income_total + other_income_total;
    let expense_total = chick_cost_total + feed_cost_total + other_expenses_total;
    let profit = income_total - expense_total;

    ReportSummary {
        chicks_in,
        mortality_total,
        sold_birds_total,
        sold_kg_total,
        feed_kg_total,
        feed_cost_total,
        sale_income_total,
        other_income_total,
        chick_cost_total,
        other_expenses_total,
        income_total,
        expense_total,
        profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_flock(initial_chicks: u32, extra_chicks: u32, price_per_chick: f64) -> Flock {
        Flock {
            id: "fl-test".to_string(),
            breed: "Cobb 500".to_string(),
            arrival_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            initial_chicks,
            extra_chicks,
            price_per_chick,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        }
    }

    fn input_on(day: u32) -> DailyInput {
        DailyInput {
            record_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            feed_type: String::new(),
            feed_cost_per_kg: 0.0,
            current_feed_kg: 0.0,
            avg_weight_grams: 0.0,
            mortality: 0,
            birds_sold: 0,
            birds_sold_kg: 0.0,
            selling_price_per_kg: 0.0,
            remarks: String::new(),
        }
    }

    fn compute(
        flock: &Flock,
        prior: Option<&DailyRecord>,
        input: DailyInput,
    ) -> Result<DailyRecord, ValidationError> {
        compute_next_daily_record(
            flock,
            prior,
            input,
            "dr-test".to_string(),
            Utc.with_ymd_and_hms(2024, 3, 2, 18, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_first_record_opens_with_chicks_in() {
        let flock = test_flock(100, 0, 50.0);
        let record = compute(
            &flock,
            None,
            DailyInput {
                mortality: 2,
                ..input_on(2)
            },
        )
        .unwrap();

        assert_eq!(record.opening_birds, 100);
        assert_eq!(record.age_days, 1);
        assert_eq!(record.closing_birds, 98);
    }

    #[test]
    fn test_first_record_includes_extra_chicks() {
        let flock = test_flock(100, 20, 50.0);
        let record = compute(&flock, None, input_on(2)).unwrap();

        assert_eq!(record.opening_birds, 120);
        assert_eq!(record.closing_birds, 120);
    }

    #[test]
    fn test_second_record_chains_from_prior() {
        let flock = test_flock(100, 0, 50.0);
        let first = compute(
            &flock,
            None,
            DailyInput {
                mortality: 2,
                ..input_on(2)
            },
        )
        .unwrap();

        let second = compute(
            &flock,
            Some(&first),
            DailyInput {
                mortality: 1,
                birds_sold: 10,
                birds_sold_kg: 20.0,
                selling_price_per_kg: 300.0,
                current_feed_kg: 5.0,
                feed_cost_per_kg: 40.0,
                ..input_on(3)
            },
        )
        .unwrap();

        assert_eq!(second.opening_birds, 98);
        assert_eq!(second.age_days, 2);
        assert_eq!(second.closing_birds, 87);
    }

    #[test]
    fn test_negative_closing_count_is_rejected() {
        let flock = test_flock(10, 0, 50.0);
        let result = compute(
            &flock,
            None,
            DailyInput {
                mortality: 6,
                birds_sold: 5,
                ..input_on(2)
            },
        );

        assert_eq!(
            result,
            Err(ValidationError::NegativeClosingCount {
                opening: 10,
                mortality: 6,
                sold: 5,
            })
        );
    }

    #[test]
    fn test_exact_sellout_closes_at_zero() {
        let flock = test_flock(10, 0, 50.0);
        let record = compute(
            &flock,
            None,
            DailyInput {
                mortality: 4,
                birds_sold: 6,
                ..input_on(2)
            },
        )
        .unwrap();

        assert_eq!(record.closing_birds, 0);
    }

    #[test]
    fn test_aggregate_with_no_records() {
        let flock = test_flock(100, 0, 50.0);
        let summary = aggregate_flock_report(&flock, &[], &[]);

        assert_eq!(summary.chicks_in, 100);
        assert_eq!(summary.mortality_total, 0);
        assert_eq!(summary.sold_birds_total, 0);
        assert_eq!(summary.sold_kg_total, 0.0);
        assert_eq!(summary.feed_kg_total, 0.0);
        assert_eq!(summary.chick_cost_total, 5000.0);
        assert_eq!(summary.income_total, 0.0);
        assert_eq!(summary.expense_total, 5000.0);
        assert_eq!(summary.profit, -5000.0);
    }

    #[test]
    fn test_aggregate_totals_over_both_record_sets() {
        let flock = test_flock(100, 0, 50.0);
        let first = compute(
            &flock,
            None,
            DailyInput {
                mortality: 2,
                ..input_on(2)
            },
        )
        .unwrap();
        let second = compute(
            &flock,
            Some(&first),
            DailyInput {
                mortality: 1,
                birds_sold: 10,
                birds_sold_kg: 20.0,
                selling_price_per_kg: 300.0,
                current_feed_kg: 5.0,
                feed_cost_per_kg: 40.0,
                ..input_on(3)
            },
        )
        .unwrap();

        let expense = FinancialRecord {
            id: "fin-1".to_string(),
            flock_id: Some(flock.id.clone()),
            record_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            entry_type: FinancialEntryType::Expense,
            category: "vaccine".to_string(),
            amount: 500.0,
            description: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
        };
        let income = FinancialRecord {
            entry_type: FinancialEntryType::Income,
            category: "manure".to_string(),
            amount: 750.0,
            id: "fin-2".to_string(),
            ..expense.clone()
        };

        let summary =
            aggregate_flock_report(&flock, &[first, second], &[expense, income]);

        assert_eq!(summary.mortality_total, 3);
        assert_eq!(summary.sold_birds_total, 10);
        assert_eq!(summary.sold_kg_total, 20.0);
        assert_eq!(summary.feed_kg_total, 5.0);
        assert_eq!(summary.feed_cost_total, 200.0);
        assert_eq!(summary.sale_income_total, 6000.0);
        assert_eq!(summary.other_expenses_total, 500.0);
        assert_eq!(summary.other_income_total, 750.0);
        assert_eq!(summary.chick_cost_total, 5000.0);
        assert_eq!(summary.income_total, 6750.0);
        assert_eq!(summary.expense_total, 5700.0);
        assert_eq!(summary.profit, 1050.0);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let flock = test_flock(50, 0, 40.0);
        let mut daily = Vec::new();
        let mut prior: Option<DailyRecord> = None;
        for day in 2..7 {
            let record = compute(
                &flock,
                prior.as_ref(),
                DailyInput {
                    mortality: 1,
                    current_feed_kg: day as f64,
                    feed_cost_per_kg: 35.0,
                    ..input_on(day)
                },
            )
            .unwrap();
            prior = Some(record.clone());
            daily.push(record);
        }

        let forward = aggregate_flock_report(&flock, &daily, &[]);
        daily.reverse();
        let reversed = aggregate_flock_report(&flock, &daily, &[]);
        daily.swap(0, 2);
        let shuffled = aggregate_flock_report(&flock, &daily, &[]);

        assert_eq!(forward, reversed);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_rounding_applies_only_at_presentation() {
        let flock = test_flock(1, 0, 0.1);
        let records: Vec<DailyRecord> = (0..3)
            .map(|i| DailyRecord {
                id: format!("dr-{}", i),
                flock_id: flock.id.clone(),
                record_date: NaiveDate::from_ymd_opt(2024, 3, 2 + i).unwrap(),
                age_days: i as u32 + 1,
                opening_birds: 1,
                mortality: 0,
                birds_sold: 0,
                birds_sold_kg: 0.0,
                selling_price_per_kg: 0.0,
                feed_type: String::new(),
                feed_cost_per_kg: 0.1,
                current_feed_kg: 0.1,
                avg_weight_grams: 0.0,
                closing_birds: 1,
                remarks: String::new(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap(),
            })
            .collect();

        let summary = aggregate_flock_report(&flock, &records, &[]);
        // three times 0.01 in binary floating point is not exactly 0.03
        assert!((summary.feed_cost_total - 0.03).abs() < 1e-9);
        assert_eq!(summary.rounded().feed_cost_total, 0.03);
        assert_eq!(summary.rounded().chick_cost_total, 0.1);
    }
}

//! Deterministic stand-in data for when storage cannot be reached.
//!
//! Values depend only on `(pool_id, day, month)`, so repeated requests for the
//! same month produce identical output.

use super::{DailyAvailability, MonthQuery};
use chrono::{Datelike, NaiveDate};

const LCG_MULTIPLIER: i128 = 9301;
const LCG_INCREMENT: i128 = 49297;
const LCG_MODULUS: i128 = 233280;

/// Seed for one day of one pool.
pub fn seed(pool_id: i64, day: u32, month: u32) -> i128 {
    i128::from(pool_id) * 1000 + i128::from(day) * 31 + i128::from(month) * 7
}

/// Pseudo-random value in [0, 1) for non-negative seeds.
pub fn seeded_random(seed: i128) -> f64 {
    // negative pool ids give a negative remainder, and so a negative value
    let value = (seed * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
    value as f64 / LCG_MODULUS as f64
}

/// Synthetic entry for a single day.
pub fn synthetic_day(pool_id: i64, date: NaiveDate, day: u32, month: u32) -> DailyAvailability {
    let seed = seed(pool_id, day, month);
    let total_bookings = (seeded_random(seed) * 8.0).floor() as i64 + 1;
    let available_slots = (seeded_random(seed + 1) * 12.0).floor() as i64 + 8;

    DailyAvailability {
        date,
        total_bookings,
        available_slots,
        pool_id,
    }
}

/// Synthetic entries for every day of the queried month.
pub fn synthetic_month(query: &MonthQuery) -> Vec<DailyAvailability> {
    query
        .dates()
        .map(|date| synthetic_day(query.pool_id(), date, date.day(), date.month()))
        .collect()
}

//! Monthly booking availability for a single pool.
//!
//! The aggregator opens one storage session per call and branches once:
//! a connected session yields live per-day counts, an unavailable backend
//! yields the deterministic synthetic month. Every call returns exactly one
//! entry per calendar day, ordered by date.

pub mod calendar;
pub mod synthetic;

use crate::db::models::DEFAULT_POOL_CAPACITY;
use crate::error::AppError;
use crate::store::{BookingSession, BookingStore, Storage, StoreError};
use chrono::{Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Derived availability for one pool on one day.
///
/// `date` is a zone-free calendar date and serializes as `YYYY-MM-DD`, so it
/// cannot drift to a neighbouring day through timezone conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAvailability {
    pub date: NaiveDate,
    pub total_bookings: i64,
    pub available_slots: i64,
    pub pool_id: i64,
}

impl DailyAvailability {
    pub fn from_counts(date: NaiveDate, total_bookings: i64, capacity: i64, pool_id: i64) -> Self {
        Self {
            date,
            total_bookings,
            available_slots: (capacity - total_bookings).max(0),
            pool_id,
        }
    }

    /// Entry used when a day's queries fail.
    pub fn unknown(date: NaiveDate, pool_id: i64) -> Self {
        Self {
            date,
            total_bookings: 0,
            available_slots: DEFAULT_POOL_CAPACITY,
            pool_id,
        }
    }
}

/// A validated `(pool, month, year)` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthQuery {
    pool_id: i64,
    first_day: NaiveDate,
    days: u32,
}

impl MonthQuery {
    /// None if the month is outside 1..=12 or the year is not representable.
    pub fn new(pool_id: i64, month: u32, year: i32) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
        let days = calendar::days_in_month(year, month)?;
        Some(Self {
            pool_id,
            first_day,
            days,
        })
    }

    /// Parse raw request parameters.
    ///
    /// `month` defaults to 1 and `year` to `current_year` when absent. Present
    /// values must be plain integers.
    ///
    /// # Errors
    /// Returns `AppError::InvalidParameters` if any value does not parse or
    /// the month does not exist
    pub fn parse(
        pool_id: &str,
        month: Option<&str>,
        year: Option<&str>,
        current_year: i32,
    ) -> Result<Self, AppError> {
        let pool_id = parse_int::<i64>("id", pool_id)?;
        let month = month.map(|m| parse_int::<u32>("month", m)).transpose()?.unwrap_or(1);
        let year = year
            .map(|y| parse_int::<i32>("year", y))
            .transpose()?
            .unwrap_or(current_year);

        Self::new(pool_id, month, year).ok_or_else(|| {
            AppError::InvalidParameters(format!("no such month: {}-{}", year, month))
        })
    }

    pub fn pool_id(&self) -> i64 {
        self.pool_id
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn days_in_month(&self) -> u32 {
        self.days
    }

    /// Every calendar day of the month, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.first_day.iter_days().take(self.days as usize)
    }
}

fn parse_int<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::InvalidParameters(format!("{}={:?} is not an integer", name, raw)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct MonthlyAvailability {
    pub source: DataSource,
    pub days: Vec<DailyAvailability>,
}

#[derive(Debug, Clone, Copy)]
pub struct AggregatorSettings {
    pub reference_offset: FixedOffset,
    /// Deadline for the whole live path of one call.
    pub request_timeout: Duration,
}

#[derive(Clone)]
pub struct AvailabilityAggregator {
    store: Arc<dyn BookingStore>,
    settings: AggregatorSettings,
}

impl AvailabilityAggregator {
    pub fn new(store: Arc<dyn BookingStore>, settings: AggregatorSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn BookingStore> {
        &self.store
    }

    /// Availability for every day of the queried month.
    ///
    /// Never fails: a failing day gets default values, and an unreachable
    /// backend or an exceeded request deadline yields the synthetic month.
    pub async fn monthly(&self, query: &MonthQuery) -> MonthlyAvailability {
        let result = match self.store.connect().await {
            Storage::Unavailable(reason) => {
                tracing::warn!(
                    pool_id = query.pool_id,
                    reason = %reason,
                    "Storage unavailable, serving synthetic availability"
                );
                self.synthetic(query)
            }
            Storage::Connected(mut session) => {
                let deadline = self.settings.request_timeout;
                let live = tokio::time::timeout(deadline, live_month(&mut *session, query)).await;
                drop(session);

                match live {
                    Ok(days) => MonthlyAvailability {
                        source: DataSource::Live,
                        days,
                    },
                    Err(_) => {
                        tracing::warn!(
                            pool_id = query.pool_id,
                            timeout_secs = deadline.as_secs(),
                            "Live availability exceeded deadline, serving synthetic availability"
                        );
                        self.synthetic(query)
                    }
                }
            }
        };

        tracing::info!(
            pool_id = query.pool_id,
            month = query.month(),
            year = query.year(),
            source = ?result.source,
            entries = result.days.len(),
            "Computed monthly availability"
        );

        result
    }

    fn synthetic(&self, query: &MonthQuery) -> MonthlyAvailability {
        MonthlyAvailability {
            source: DataSource::Synthetic,
            days: synthetic::synthetic_month(query),
        }
    }

}

/// Query each day in turn; one outstanding query at a time.
async fn live_month(
    session: &mut dyn BookingSession,
    query: &MonthQuery,
) -> Vec<DailyAvailability> {
    let mut days = Vec::with_capacity(query.days as usize);

    for date in query.dates() {
        let entry = match load_day(session, query.pool_id, date).await {
            Ok((total_bookings, capacity)) => {
                DailyAvailability::from_counts(date, total_bookings, capacity, query.pool_id)
            }
            Err(err) => {
                tracing::warn!(
                    pool_id = query.pool_id,
                    date = %date,
                    error = %err,
                    "Failed to load day, using default availability"
                );
                DailyAvailability::unknown(date, query.pool_id)
            }
        };

        days.push(entry);
    }

    days
}

async fn load_day(
    session: &mut dyn BookingSession,
    pool_id: i64,
    date: NaiveDate,
) -> Result<(i64, i64), StoreError> {
    let total_bookings = session.count_active_bookings(pool_id, date).await?;
    let capacity = session
        .pool_capacity(pool_id)
        .await?
        .unwrap_or(DEFAULT_POOL_CAPACITY);

    Ok((total_bookings, capacity))
}

//! In-process booking store.
//!
//! Serves the offline mode (no database configured) and lets tests simulate
//! an unreachable backend, failing days and slow queries.

use super::{BookingSession, BookingStore, Storage, StoreError};
use crate::db::models::{Booking, BookingStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct MemoryState {
    capacities: HashMap<i64, i64>,
    bookings: Vec<Booking>,
    unreachable: Option<String>,
    failing_dates: HashSet<NaiveDate>,
    failing_capacity_dates: HashSet<NaiveDate>,
    query_delay: Option<Duration>,
    connect_delay: Option<Duration>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    open_sessions: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose sessions can never be opened.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_unreachable(Some(reason.into()));
        store
    }

    pub fn with_pool(self, pool_id: i64, capacity: i64) -> Self {
        self.write().capacities.insert(pool_id, capacity);
        self
    }

    pub fn with_booking(self, pool_id: i64, date: NaiveDate, status: BookingStatus) -> Self {
        self.add_booking(Booking {
            pool_id,
            reservation_date: date,
            status,
        });
        self
    }

    /// Make every query touching `date` fail.
    pub fn failing_on(self, date: NaiveDate) -> Self {
        self.write().failing_dates.insert(date);
        self
    }

    /// Make the capacity lookup fail for the day whose bookings were just counted.
    pub fn failing_capacity_on(self, date: NaiveDate) -> Self {
        self.write().failing_capacity_dates.insert(date);
        self
    }

    pub fn with_connect_delay(self, delay: Duration) -> Self {
        self.write().connect_delay = Some(delay);
        self
    }

    pub fn with_query_delay(self, delay: Duration) -> Self {
        self.write().query_delay = Some(delay);
        self
    }

    pub fn add_booking(&self, booking: Booking) {
        self.write().bookings.push(booking);
    }

    pub fn set_unreachable(&self, reason: Option<String>) {
        self.write().unreachable = reason;
    }

    /// Number of sessions currently held by callers.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn connect(&self) -> Storage {
        let delay = self.read().connect_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(reason) = self.read().unreachable.clone() {
            return Storage::Unavailable(reason);
        }

        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Storage::Connected(Box::new(MemorySession {
            store: self.clone(),
            current_date: None,
        }))
    }
}

struct MemorySession {
    store: MemoryStore,
    // date of the last booking count, used to scope capacity failures
    current_date: Option<NaiveDate>,
}

impl MemorySession {
    async fn simulate_latency(&self) {
        let delay = self.store.read().query_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.store.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookingSession for MemorySession {
    async fn count_active_bookings(
        &mut self,
        pool_id: i64,
        date: NaiveDate,
    ) -> Result<i64, StoreError> {
        self.simulate_latency().await;
        self.current_date = Some(date);

        let state = self.store.read();
        if state.failing_dates.contains(&date) {
            return Err(StoreError::Unavailable(format!("query failed for {}", date)));
        }

        let count = state
            .bookings
            .iter()
            .filter(|b| {
                b.pool_id == pool_id
                    && b.reservation_date == date
                    && b.status.counts_toward_occupancy()
            })
            .count();

        Ok(count as i64)
    }

    async fn pool_capacity(&mut self, pool_id: i64) -> Result<Option<i64>, StoreError> {
        let state = self.store.read();
        let failing = self
            .current_date
            .filter(|date| state.failing_capacity_dates.contains(date));
        if let Some(date) = failing {
            return Err(StoreError::Unavailable(format!(
                "capacity lookup failed for {}",
                date
            )));
        }

        Ok(state.capacities.get(&pool_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_counts_only_occupying_statuses() {
        let store = MemoryStore::new()
            .with_pool(1, 10)
            .with_booking(1, date(2024, 3, 5), BookingStatus::Confirmed)
            .with_booking(1, date(2024, 3, 5), BookingStatus::Pending)
            .with_booking(1, date(2024, 3, 5), BookingStatus::Cancelled)
            .with_booking(1, date(2024, 3, 5), BookingStatus::Completed)
            .with_booking(2, date(2024, 3, 5), BookingStatus::Confirmed)
            .with_booking(1, date(2024, 3, 6), BookingStatus::Confirmed);

        let Storage::Connected(mut session) = store.connect().await else {
            panic!("expected a connected session");
        };

        let count = session
            .count_active_bookings(1, date(2024, 3, 5))
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(session.pool_capacity(1).await.unwrap(), Some(10));
        assert_eq!(session.pool_capacity(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let store = MemoryStore::unreachable("connection refused");
        match store.connect().await {
            Storage::Unavailable(reason) => assert_eq!(reason, "connection refused"),
            Storage::Connected(_) => panic!("expected unavailable storage"),
        }
        assert_eq!(store.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_failing_date() {
        let store = MemoryStore::new().failing_on(date(2024, 1, 2));
        let Storage::Connected(mut session) = store.connect().await else {
            panic!("expected a connected session");
        };

        assert!(session.count_active_bookings(1, date(2024, 1, 2)).await.is_err());
        assert!(session.count_active_bookings(1, date(2024, 1, 3)).await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_capacity_follows_counted_date() {
        let store = MemoryStore::new()
            .with_pool(1, 10)
            .failing_capacity_on(date(2024, 1, 2));
        let Storage::Connected(mut session) = store.connect().await else {
            panic!("expected a connected session");
        };

        session.count_active_bookings(1, date(2024, 1, 2)).await.unwrap();
        assert!(session.pool_capacity(1).await.is_err());

        session.count_active_bookings(1, date(2024, 1, 3)).await.unwrap();
        assert_eq!(session.pool_capacity(1).await.unwrap(), Some(10));
    }

    #[tokio::test]
    async fn test_sessions_released_on_drop() {
        let store = MemoryStore::new();
        let first = store.connect().await;
        let second = store.connect().await;
        assert_eq!(store.open_sessions(), 2);

        drop(first);
        assert_eq!(store.open_sessions(), 1);
        drop(second);
        assert_eq!(store.open_sessions(), 0);
    }
}

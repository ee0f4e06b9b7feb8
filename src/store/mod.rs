//! Storage access for availability queries.
//!
//! Opening a session yields an explicit [`Storage`] value instead of an error,
//! so callers branch once on whether the backend is reachable.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of opening a storage session.
pub enum Storage {
    Connected(Box<dyn BookingSession>),
    Unavailable(String),
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Storage::Connected(_) => f.write_str("Connected"),
            Storage::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Open a session owned by a single request.
    async fn connect(&self) -> Storage;
}

/// Read-only queries against one open session.
///
/// Dropping the session releases the underlying connection.
#[async_trait]
pub trait BookingSession: Send {
    /// Count confirmed and pending bookings for a pool on a date.
    async fn count_active_bookings(
        &mut self,
        pool_id: i64,
        date: NaiveDate,
    ) -> Result<i64, StoreError>;

    /// Daily capacity of a pool, None when the pool row is missing.
    async fn pool_capacity(&mut self, pool_id: i64) -> Result<Option<i64>, StoreError>;
}

use super::{BookingSession, BookingStore, Storage, StoreError};
use crate::db::repository;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{MySql, MySqlPool, pool::PoolConnection};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl BookingStore for MySqlStore {
    async fn connect(&self) -> Storage {
        match self.pool.acquire().await {
            Ok(conn) => Storage::Connected(Box::new(MySqlSession { conn })),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to acquire database connection");
                Storage::Unavailable(err.to_string())
            }
        }
    }
}

/// Holds one pooled connection; returned to the pool on drop.
pub struct MySqlSession {
    conn: PoolConnection<MySql>,
}

#[async_trait]
impl BookingSession for MySqlSession {
    async fn count_active_bookings(
        &mut self,
        pool_id: i64,
        date: NaiveDate,
    ) -> Result<i64, StoreError> {
        Ok(repository::count_active_bookings(&mut *self.conn, pool_id, date).await?)
    }

    async fn pool_capacity(&mut self, pool_id: i64) -> Result<Option<i64>, StoreError> {
        Ok(repository::get_pool_capacity(&mut *self.conn, pool_id).await?)
    }
}

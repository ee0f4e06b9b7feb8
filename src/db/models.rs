use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Capacity assumed when a pool row is missing or a day's query fails.
pub const DEFAULT_POOL_CAPACITY: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Pending => "pending",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Only confirmed and pending bookings occupy a slot.
    pub fn counts_toward_occupancy(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub pool_id: i64,
    pub reservation_date: NaiveDate,
    pub status: BookingStatus,
}

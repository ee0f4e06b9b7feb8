use chrono::NaiveDate;
use sqlx::MySqlConnection;

/// Count bookings that occupy a slot in a pool on a given date.
///
/// # Arguments
/// * `conn` - Connection owned by the current request
/// * `pool_id` - Pool ID
/// * `date` - Reservation date (time component ignored)
///
/// # Errors
/// Returns error if the query fails
pub async fn count_active_bookings(
    conn: &mut MySqlConnection,
    pool_id: i64,
    date: NaiveDate,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM bookings
        WHERE pool_id = ?
            AND DATE(reservation_date) = ?
            AND status IN ('confirmed', 'pending')
        "#,
    )
    .bind(pool_id)
    .bind(date)
    .fetch_one(conn)
    .await
}

/// Get the daily capacity of a pool.
///
/// # Returns
/// None if the pool does not exist
pub async fn get_pool_capacity(
    conn: &mut MySqlConnection,
    pool_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    let capacity = sqlx::query_scalar::<_, Option<i32>>("SELECT capacity FROM pools WHERE id = ?")
        .bind(pool_id)
        .fetch_optional(conn)
        .await?;

    Ok(capacity.flatten().map(i64::from))
}

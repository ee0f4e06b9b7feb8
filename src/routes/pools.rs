use super::AppState;
use crate::availability::{DailyAvailability, MonthQuery, calendar};
use crate::error::AppError;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::Deserialize;

/// Query parameters for the availability-stats endpoint.
///
/// Kept as raw strings so that unparsable values map to our own 400 body.
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

/// Monthly availability for one pool
///
/// # Endpoint
/// GET /api/pools/{id}/availability-stats?month=<1-12>&year=<YYYY>
///
/// # Query Parameters
/// - `month`: defaults to 1
/// - `year`: defaults to the current year in the reference timezone
///
/// # Returns
/// 200 OK with one entry per day of the month, ordered by date. Entries come
/// from synthetic data when the database is unreachable.
///
/// # Errors
/// Returns 400 Bad Request if id, month or year are not integers, including
/// requests axum cannot extract (non-UTF-8 id, repeated query keys)
pub async fn availability_stats(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<Vec<DailyAvailability>>, AppError> {
    let Path(id) = path?;
    let Query(params) = params?;
    let current_year = calendar::current_year(&state.aggregator.settings().reference_offset);
    let query = MonthQuery::parse(
        &id,
        params.month.as_deref(),
        params.year.as_deref(),
        current_year,
    )?;

    tracing::debug!(
        pool_id = query.pool_id(),
        month = query.month(),
        year = query.year(),
        "Fetching monthly availability"
    );

    let availability = state.aggregator.monthly(&query).await;
    Ok(Json(availability.days))
}

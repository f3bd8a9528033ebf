//! Calendar month handler

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Local};

use crate::application::services::CalendarView;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse};
use crate::interfaces::http::modules::reservations::ReservationAppState;

use super::dto::*;

#[utoipa::path(
    get,
    path = "/api/v1/calendar",
    tag = "Calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Month grid with the reservation covering each day", body = ApiResponse<MonthDto>),
        (status = 400, description = "Year out of range")
    )
)]
pub async fn get_month(
    State(state): State<ReservationAppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<ApiResponse<MonthDto>>, ApiError<MonthDto>> {
    let today = Local::now().date_naive();
    let year = query.year.unwrap_or(today.year());
    let month0 = query.month.unwrap_or(today.month0() as i32);

    let reservations = state.service.list().await.map_err(domain_error)?;
    let view = CalendarView::new(year, month0)
        .map_err(domain_error)?
        .with_reservations(reservations);

    Ok(Json(ApiResponse::success(MonthDto {
        year: view.year(),
        month: view.month0(),
        label: view.grid().label().to_string(),
        cells: view.days().into_iter().map(DayCellDto::from).collect(),
    })))
}

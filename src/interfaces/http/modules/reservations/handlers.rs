//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::services::ReservationService;
use crate::domain::ErrorKind;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, EmptyData, ValidatedJson};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub service: Arc<ReservationService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    responses(
        (status = 200, description = "All reservations ordered by start date", body = ApiResponse<Vec<ReservationDto>>),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
) -> Result<Json<ApiResponse<Vec<ReservationDto>>>, ApiError<Vec<ReservationDto>>> {
    let reservations = state.service.list().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError<ReservationDto>> {
    let reservation = state.service.get(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Empty name, malformed or inverted dates"),
        (status = 409, description = "Overlaps an existing reservation"),
        (status = 422, description = "Field too long")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError<ReservationDto>> {
    let created = state
        .service
        .create(request.into_draft())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid input or body id differs from path"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Overlaps another reservation")
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError<ReservationDto>> {
    if let Some(body_id) = request.id.as_deref() {
        if body_id != id {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(
                    ErrorKind::Validation,
                    format!("Body id '{}' does not match path id '{}'", body_id, id),
                )),
            ));
        }
    }

    let updated = state
        .service
        .update(&id, request.into_draft())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError<EmptyData>> {
    state.service.delete(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::ReservationService;
use crate::interfaces::http::common::{ApiResponse, EmptyData};

use super::modules::{calendar, health, metrics, reservations};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
        // Calendar
        calendar::get_month,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            reservations::ReservationRequest,
            reservations::ReservationDto,
            calendar::MonthDto,
            calendar::DayCellDto,
            calendar::BookedByDto,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Reservations", description = "Create, edit and cancel bookings of the shared calendar"),
        (name = "Calendar", description = "Month grids with the booking covering each day"),
    ),
    info(
        title = "Maison Booking API",
        version = "1.0.0",
        description = "Shared-calendar reservations. Overlapping date ranges are rejected with 409; \
                       a range ending on the day another starts counts as overlapping."
    )
)]
pub struct ApiDoc;

/// Build the full HTTP router.
///
/// `db` is only used for the health probe and is `None` when the service
/// runs on the in-memory store.
pub fn create_api_router(
    service: Arc<ReservationService>,
    db: Option<DatabaseConnection>,
    prometheus: PrometheusHandle,
) -> Router {
    let reservation_state = reservations::ReservationAppState { service };

    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
        .with_state(reservation_state.clone());

    let calendar_routes = Router::new()
        .route("/", get(calendar::get_month))
        .with_state(reservation_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState { handle: prometheus });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/calendar", calendar_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

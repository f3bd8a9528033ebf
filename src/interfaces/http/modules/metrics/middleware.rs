//! Per-request HTTP metrics

use std::time::Instant;

use axum::{extract::MatchedPath, extract::Request, middleware::Next, response::Response};

/// Route template of the request, so `/api/v1/reservations/{id}` is one series
/// rather than one per reservation.
fn route_of(request: &Request) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => "unmatched".to_string(),
    }
}

/// Records `booking_http_requests_total{method,route,status}` and
/// `booking_http_request_duration_seconds{method,route}`.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_string();
    let route = route_of(&request);

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "booking_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("booking_http_request_duration_seconds", "method" => method, "route" => route)
        .record(elapsed);

    response
}

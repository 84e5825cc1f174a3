use axum::http::StatusCode;

/// Handler for `GET /healthz`. The process is up if it can answer.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a readiness check outcome to the status returned by `GET /readyz`.
pub fn readiness_status(ready: bool) -> StatusCode {
    if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

//! Liveness of the mock backend

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// indyctl build serving the mock
    pub version: &'static str,
    /// Repository manager version the fixtures stand in for
    pub backend_version: String,
    pub stores: usize,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let fixtures = state.fixtures();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        backend_version: fixtures.version().version.clone(),
        stores: fixtures.endpoints(None).len(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::http::routes::test_support::get;

    #[tokio::test]
    async fn health_reports_mocked_backend() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["backend_version"], "3.3.2");
        assert!(body["stores"].as_u64().unwrap() > 0);
    }
}

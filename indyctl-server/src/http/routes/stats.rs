//! Stats endpoints: package types and version info

use axum::{extract::State, routing::get, Json, Router};
use indyctl_core::VersionInfo;

use crate::state::AppState;

/// GET /api/stats/package-type/keys
async fn package_type_keys(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.fixtures().package_types())
}

/// GET /api/stats/version-info
async fn version_info(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(state.fixtures().version().clone())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stats/package-type/keys", get(package_type_keys))
        .route("/api/stats/version-info", get(version_info))
}

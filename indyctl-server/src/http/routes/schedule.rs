//! Disable-timeout schedule endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use indyctl_core::{DisableTimeout, DisableTimeoutList, StoreKey};

use crate::http::error::ApiError;
use crate::state::AppState;

/// GET /api/admin/schedule/store/all/disable-timeout
async fn all_timeouts(State(state): State<AppState>) -> Json<DisableTimeoutList> {
    Json(DisableTimeoutList {
        items: state.fixtures().timeouts().to_vec(),
    })
}

/// GET /api/admin/schedule/store/{packageType}/{type}/{name}/disable-timeout
async fn store_timeout(
    State(state): State<AppState>,
    Path((package_type, store_type, name)): Path<(String, String, String)>,
) -> Result<Json<DisableTimeout>, ApiError> {
    let store_type = store_type
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Unknown store type '{}'", store_type)))?;
    let key = StoreKey::new(package_type, store_type, name);

    state
        .fixtures()
        .timeout_for(&key)
        .cloned()
        .map(Json)
        .ok_or_else(ApiError::no_such_store)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/schedule/store/all/disable-timeout", get(all_timeouts))
        .route(
            "/api/admin/schedule/store/{package_type}/{store_type}/{name}/disable-timeout",
            get(store_timeout),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::http::routes::test_support::get;

    #[tokio::test]
    async fn lists_all_timeouts() {
        let (status, body) = get("/api/admin/schedule/store/all/disable-timeout").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn finds_store_timeout() {
        let (status, body) =
            get("/api/admin/schedule/store/maven/group/builds/disable-timeout").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["expiration"], 1_893_459_725_000i64);
    }

    #[tokio::test]
    async fn missing_timeout_is_404() {
        let (status, body) =
            get("/api/admin/schedule/store/maven/group/public/disable-timeout").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No such store!");
    }
}

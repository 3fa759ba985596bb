//! Store endpoints: paged listings, endpoint query, get/create/update

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use indyctl_core::{Store, StoreKey, StorePage, StoreType};
use serde::Deserialize;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::state::AppState;

/// Package type segment meaning "every package type" in listings
const ALL_PACKAGE_TYPES: &str = "_all";

/// Package type segment meaning "every package type" in endpoint queries
const ALL_ENDPOINTS: &str = "all";

/// Query parameters for paged listings
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// Opaque cursor returned as `next_page` by the previous page
    pub page: Option<String>,
}

fn parse_store_type(raw: &str) -> Result<StoreType, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Unknown store type '{}'", raw)))
}

/// GET /api/admin/stores/{packageType}/{type}?page=cursor
async fn list_stores(
    State(state): State<AppState>,
    Path((package_type, store_type)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> Result<Json<StorePage>, ApiError> {
    let store_type = parse_store_type(&store_type)?;
    let filter = (package_type != ALL_PACKAGE_TYPES).then_some(package_type.as_str());
    let stores = state.fixtures().list(filter, store_type);

    let offset = match params.page.as_deref() {
        None | Some("") => 0,
        Some(cursor) => cursor
            .parse::<usize>()
            .map_err(|_| ApiError::bad_request(format!("Invalid page cursor '{}'", cursor)))?,
    };

    let end = offset.saturating_add(state.page_size()).min(stores.len());
    let items = stores
        .get(offset..end)
        .unwrap_or(&[])
        .iter()
        .map(|s| (*s).clone())
        .collect();
    let next_page = (end < stores.len()).then(|| end.to_string());

    tracing::debug!(%package_type, %store_type, offset, ?next_page, "listing stores");
    Ok(Json(StorePage { items, next_page }))
}

/// GET /api/admin/stores/query/endpoints/{packageType}
async fn query_endpoints(
    State(state): State<AppState>,
    Path(package_type): Path<String>,
) -> Json<StorePage> {
    let filter = (package_type != ALL_ENDPOINTS).then_some(package_type.as_str());
    let items = state
        .fixtures()
        .endpoints(filter)
        .into_iter()
        .cloned()
        .collect();

    Json(StorePage {
        items,
        next_page: None,
    })
}

/// GET /api/admin/stores/{packageType}/{type}/{name}
async fn get_store(
    State(state): State<AppState>,
    Path((package_type, store_type, name)): Path<(String, String, String)>,
) -> Result<Json<Store>, ApiError> {
    let key = StoreKey::new(package_type, parse_store_type(&store_type)?, name);
    let store = state.fixtures().find(&key).ok_or_else(ApiError::no_such_store)?;
    Ok(Json(store.clone()))
}

/// Validate a create/update request the way the real server does.
fn parse_store_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map_or(false, |v| v.trim().eq_ignore_ascii_case("application/json"));
    if !is_json {
        return Err(ApiError::bad_request("Bad request: wrong header content-type"));
    }

    let repo: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Bad request: invalid JSON body: {}", e)))?;

    let present = |field: &str| {
        repo.get(field)
            .and_then(Value::as_str)
            .map_or(false, |s| !s.is_empty())
    };
    if !(present("packageType") && present("type") && present("name")) {
        return Err(ApiError::bad_request(
            "Bad repo request: missing packageType or type or name for repo!",
        ));
    }

    Ok(repo)
}

/// POST /api/admin/stores/{packageType}/{type}/{name}
async fn create_store(
    Path((package_type, store_type, name)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    parse_store_body(&headers, &body)?;
    tracing::info!("mock create {}:{}:{}", package_type, store_type, name);
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/admin/stores/{packageType}/{type}/{name}
async fn update_store(
    Path((package_type, store_type, name)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let repo = parse_store_body(&headers, &body)?;
    tracing::info!("mock update {}:{}:{}", package_type, store_type, name);
    Ok(Json(repo))
}

/// Store routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/stores/query/endpoints/{package_type}",
            get(query_endpoints),
        )
        .route("/api/admin/stores/{package_type}/{store_type}", get(list_stores))
        .route(
            "/api/admin/stores/{package_type}/{store_type}/{name}",
            get(get_store).post(create_store).put(update_store),
        )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use crate::http::routes::test_support::{get, send};

    fn write(method: &str, content_type: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri("/api/admin/stores/maven/hosted/new-repo");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn gets_single_store() {
        let (status, body) = get("/api/admin/stores/maven/group/public").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "maven:group:public");
        assert_eq!(body["constituents"][0], "maven:remote:central");
    }

    #[tokio::test]
    async fn missing_store_is_404() {
        let (status, body) = get("/api/admin/stores/maven/remote/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No such store!");
    }

    #[tokio::test]
    async fn unknown_type_is_400() {
        let (status, _) = get("/api/admin/stores/maven/proxy/central").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn listing_pages_with_cursor() {
        let (status, first) = get("/api/admin/stores/_all/remote").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["items"].as_array().unwrap().len(), 2);
        assert_eq!(first["next_page"], "2");

        let (_, last) = get("/api/admin/stores/_all/remote?page=4").await;
        assert_eq!(last["items"].as_array().unwrap().len(), 1);
        assert!(last.get("next_page").is_none());
    }

    #[tokio::test]
    async fn listing_filters_package_type() {
        let (_, page) = get("/api/admin/stores/npm/remote").await;
        let items = page["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["key"], "npm:remote:npmjs");
        assert!(page.get("next_page").is_none());
    }

    #[tokio::test]
    async fn invalid_cursor_is_400() {
        let (status, _) = get("/api/admin/stores/_all/remote?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn endpoint_query_spans_types() {
        let (_, page) = get("/api/admin/stores/query/endpoints/maven").await;
        assert_eq!(page["items"].as_array().unwrap().len(), 7);

        let (_, all) = get("/api/admin/stores/query/endpoints/all").await;
        assert_eq!(all["items"].as_array().unwrap().len(), 11);
    }

    #[tokio::test]
    async fn create_returns_204() {
        let body = json!({"packageType": "maven", "type": "hosted", "name": "new-repo"});
        let (status, _) = send(write("POST", Some("application/json"), body)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let body = json!({"packageType": "maven", "type": "hosted"});
        let (status, value) = send(write("POST", Some("application/json"), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            value["error"],
            "Bad repo request: missing packageType or type or name for repo!"
        );
    }

    #[tokio::test]
    async fn write_requires_json_content_type() {
        let body = json!({"packageType": "maven", "type": "hosted", "name": "new-repo"});
        let (status, value) = send(write("PUT", Some("text/plain"), body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "Bad request: wrong header content-type");

        let (status, _) = send(write("PUT", None, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_echoes_body() {
        let body = json!({
            "packageType": "maven",
            "type": "hosted",
            "name": "new-repo",
            "description": "edited"
        });
        let (status, value) = send(write("PUT", Some("application/json"), body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, body);
    }
}

//! Store API handlers
//!
//! ## Routes
//!
//! - `GET /stores` - filtered, paginated listing; the optional `filter`
//!   query parameter carries a URL-encoded JSON [`StoreFilter`]
//! - `POST /stores/search` - same semantics with the filter in the body
//! - `GET /stores/{id}` - single store
//! - `GET /stores/{id}/nearby` - stores within `distance` km (default 5)
//! - `POST /stores/{id}/close`, `POST /stores/{id}/open`
//! - `PATCH /stores/{id}` - sparse update (name, url, socials)
//! - `POST /stores/import` - one-shot CSV feed import; refuses when the
//!   collection is non-empty

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::routes::{error_from, error_response, json_response, not_found};
use crate::server::AppState;
use crate::stores::{ImportSummary, Pagination, StoreFilter, StoreUpdate, DEFAULT_RADIUS_KM};

/// Parsed store route components
#[derive(Debug, PartialEq)]
struct StoreRoute<'a> {
    /// Store document id
    id: &'a str,
    /// Optional trailing action ("nearby", "close", "open")
    action: Option<&'a str>,
}

impl<'a> StoreRoute<'a> {
    /// Parse a path like "/stores/{id}" or "/stores/{id}/{action}"
    fn parse(path: &'a str) -> Option<Self> {
        let stripped = path.strip_prefix("/stores/")?;
        let mut parts = stripped.splitn(2, '/');

        let id = parts.next().filter(|s| !s.is_empty())?;
        let action = parts.next().filter(|s| !s.is_empty());

        Some(Self { id, action })
    }
}

/// Parse query string into key-value map
fn parse_query_params(query: &str) -> HashMap<String, String> {
    if query.is_empty() {
        return HashMap::new();
    }

    query
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next().unwrap_or("");
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

fn param_i64(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.parse().ok())
}

fn param_f64(params: &HashMap<String, String>, key: &str) -> Option<f64> {
    params.get(key).and_then(|v| v.parse().ok())
}

fn param_bool(params: &HashMap<String, String>, key: &str) -> bool {
    params
        .get(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// Decode the `filter` query parameter (URL-encoded JSON)
fn parse_filter_param(
    params: &HashMap<String, String>,
) -> Result<Option<StoreFilter>, Response<Full<Bytes>>> {
    let Some(raw) = params.get("filter") else {
        return Ok(None);
    };

    let decoded = urlencoding::decode(raw).map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            &format!("filter parameter is not valid UTF-8: {e}"),
            "INVALID_FILTER",
        )
    })?;

    let filter = serde_json::from_str::<StoreFilter>(&decoded).map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            &format!("filter parameter is not a valid filter: {e}"),
            "INVALID_FILTER",
        )
    })?;

    Ok(Some(filter))
}

/// Read and deserialize a JSON request body; an empty body is the default
async fn read_json<T>(req: Request<Incoming>) -> Result<T, Response<Full<Bytes>>>
where
    T: serde::de::DeserializeOwned + Default,
{
    let bytes = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                &format!("failed to read request body: {e}"),
                "BAD_BODY",
            ))
        }
    };

    if bytes.is_empty() {
        return Ok(T::default());
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            &format!("invalid JSON body: {e}"),
            "INVALID_BODY",
        )
    })
}

/// Dispatch /stores/{id}[/{action}] requests
pub async fn dispatch(
    state: Arc<AppState>,
    method: Method,
    path: &str,
    query: Option<&str>,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let Some(route) = StoreRoute::parse(path) else {
        return not_found(path);
    };

    match (method, route.action) {
        (Method::GET, Some("nearby")) => nearby(state, route.id, query).await,
        (Method::POST, Some("close")) => close(state, route.id).await,
        (Method::POST, Some("open")) => open(state, route.id).await,
        (Method::GET, None) => get(state, route.id).await,
        (Method::PATCH, None) => update(state, route.id, req).await,
        _ => not_found(path),
    }
}

/// Handle GET /stores
pub async fn list(state: Arc<AppState>, query: Option<&str>) -> Response<Full<Bytes>> {
    let params = parse_query_params(query.unwrap_or(""));

    let filter = match parse_filter_param(&params) {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    let pagination = match Pagination::normalize(param_i64(&params, "page"), param_i64(&params, "limit")) {
        Ok(p) => p,
        Err(e) => return error_from(&e),
    };

    let include_closed = param_bool(&params, "include_closed");

    debug!(page = pagination.page, limit = pagination.limit, include_closed, "store listing");

    run_list(state, filter, pagination, include_closed).await
}

/// Body shape for POST /stores/search
#[derive(Debug, Default, Deserialize)]
struct SearchRequest {
    #[serde(rename = "where")]
    filter: Option<StoreFilter>,
    page: Option<i64>,
    limit: Option<i64>,
    #[serde(default)]
    include_closed: bool,
}

/// Handle POST /stores/search
pub async fn search(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let body: SearchRequest = match read_json(req).await {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let pagination = match Pagination::normalize(body.page, body.limit) {
        Ok(p) => p,
        Err(e) => return error_from(&e),
    };

    run_list(state, body.filter, pagination, body.include_closed).await
}

async fn run_list(
    state: Arc<AppState>,
    filter: Option<StoreFilter>,
    pagination: Pagination,
    include_closed: bool,
) -> Response<Full<Bytes>> {
    let service = match state.stores().await {
        Ok(s) => s,
        Err(e) => return error_from(&e),
    };

    match service
        .list_stores(filter.as_ref(), pagination, include_closed)
        .await
    {
        Ok(stores) => json_response(&stores),
        Err(e) => error_from(&e),
    }
}

/// Handle GET /stores/{id}
async fn get(state: Arc<AppState>, id: &str) -> Response<Full<Bytes>> {
    let service = match state.stores().await {
        Ok(s) => s,
        Err(e) => return error_from(&e),
    };

    match service.get_store(id).await {
        Ok(store) => json_response(&store),
        Err(e) => error_from(&e),
    }
}

/// Handle GET /stores/{id}/nearby
async fn nearby(state: Arc<AppState>, id: &str, query: Option<&str>) -> Response<Full<Bytes>> {
    let params = parse_query_params(query.unwrap_or(""));
    let distance = param_f64(&params, "distance").unwrap_or(DEFAULT_RADIUS_KM);
    let include_closed = param_bool(&params, "include_closed");

    let service = match state.stores().await {
        Ok(s) => s,
        Err(e) => return error_from(&e),
    };

    match service.nearby_stores(id, distance, include_closed).await {
        Ok(stores) => json_response(&stores),
        Err(e) => error_from(&e),
    }
}

/// Handle POST /stores/{id}/close
async fn close(state: Arc<AppState>, id: &str) -> Response<Full<Bytes>> {
    let service = match state.stores().await {
        Ok(s) => s,
        Err(e) => return error_from(&e),
    };

    match service.close_store(id).await {
        Ok(store) => json_response(&store),
        Err(e) => error_from(&e),
    }
}

/// Handle POST /stores/{id}/open
async fn open(state: Arc<AppState>, id: &str) -> Response<Full<Bytes>> {
    let service = match state.stores().await {
        Ok(s) => s,
        Err(e) => return error_from(&e),
    };

    match service.open_store(id).await {
        Ok(store) => json_response(&store),
        Err(e) => error_from(&e),
    }
}

/// Handle PATCH /stores/{id}
async fn update(state: Arc<AppState>, id: &str, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let body: StoreUpdate = match read_json(req).await {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let service = match state.stores().await {
        Ok(s) => s,
        Err(e) => return error_from(&e),
    };

    match service.update_store(id, body).await {
        Ok(store) => json_response(&store),
        Err(e) => error_from(&e),
    }
}

/// Import response body, `{ "data": { "count": n } }`
#[derive(serde::Serialize)]
struct ImportResponse {
    data: ImportSummary,
}

/// Handle POST /stores/import
pub async fn import(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let service = match state.stores().await {
        Ok(s) => s,
        Err(e) => return error_from(&e),
    };

    match service.import_from_feed(&state.args.stores_uri).await {
        Ok(summary) => json_response(&ImportResponse { data: summary }),
        Err(e) => error_from(&e),
    }
}

//! HTTP glue: binds every request to a locale and exposes the result to
//! handlers.
//!
//! [`i18n_middleware`] reads the locale signals from the request (headers,
//! query string and a JSON body), binds a [`RequestI18n`] and stores it in the
//! request extensions for handlers and in the response extensions for outer
//! layers. Handlers take it as an extractor.

use crate::i18n::{I18n, RequestI18n, RequestSignals};
use axum::{
    async_trait,
    body::{to_bytes, Body},
    extract::{FromRequestParts, Query, Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        request::Parts,
        HeaderMap, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Largest JSON body buffered to look for a locale field.
///
/// Larger bodies, and bodies without a `Content-Length`, reach the handler
/// untouched and contribute no locale signal.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Middleware for [`axum::middleware::from_fn_with_state`].
pub async fn i18n_middleware(State(i18n): State<I18n>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();

    let (body, json_body) = if is_json(&parts.headers) && fits_buffer(&parts.headers) {
        match to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => {
                let value = serde_json::from_slice::<Value>(&bytes).ok();
                (Body::from(bytes), value)
            }
            Err(err) => {
                warn!("i18n: could not read request body: {}", err);
                return (StatusCode::BAD_REQUEST, "failed to read request body").into_response();
            }
        }
    } else {
        (body, None)
    };

    let bound = i18n.bind(&signals_from_parts(&parts, json_body));

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(bound.clone());

    let mut response = next.run(req).await;
    response.extensions_mut().insert(bound);
    response
}

/// Collect the locale signals of a request.
///
/// Header values that are not valid visible ASCII are skipped, as is a query
/// string that does not parse.
pub fn signals_from_parts(parts: &Parts, body: Option<Value>) -> RequestSignals {
    let mut signals = RequestSignals::new();

    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            signals = signals.with_header(name.as_str(), value);
        }
    }

    if let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
        for (name, value) in params {
            signals = signals.with_query(name, value);
        }
    }

    if let Some(body) = body {
        signals = signals.with_body(body);
    }

    signals
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn fits_buffer(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<usize>().ok())
        .is_some_and(|len| len <= MAX_BODY_BYTES)
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestI18n
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestI18n>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "i18n middleware is not installed",
        ))
    }
}

// ==================== Routes ====================

#[derive(Debug, Deserialize)]
struct TranslateParams {
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslateBody {
    #[serde(default)]
    key: Value,
}

/// Router serving the catalog over HTTP.
///
/// - `GET /translate?key=...` and `POST /translate` with `{"key": ...}`
///   answer `{"locale": ..., "text": ...}` in the request's locale
/// - `GET /i18n/metrics` reports the translation counters
/// - `GET /health` for liveness probes
pub fn app(i18n: I18n) -> Router {
    Router::new()
        .route("/translate", get(translate_query).post(translate_body))
        .route("/i18n/metrics", get(metrics))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(i18n.clone(), i18n_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(i18n)
}

async fn translate_query(i18n: RequestI18n, Query(params): Query<TranslateParams>) -> Json<Value> {
    let text = i18n.t(params.key.as_deref().unwrap_or_default());
    Json(json!({ "locale": i18n.locale(), "text": text }))
}

async fn translate_body(i18n: RequestI18n, Json(body): Json<TranslateBody>) -> Json<Value> {
    Json(json!({ "locale": i18n.locale(), "text": i18n.t_value(&body.key) }))
}

async fn metrics(State(i18n): State<I18n>) -> impl IntoResponse {
    Json(i18n.metrics())
}

async fn health() -> &'static str {
    "OK"
}

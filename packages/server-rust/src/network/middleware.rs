//! Transport middleware for the placement API.
//!
//! `Router::layer` wraps everything added before it, so the layers below are
//! listed innermost first. A request passes through them in this order:
//!
//! 1. request id assigned (`x-request-id`, UUID v4 unless the client sent one)
//! 2. request/response trace span at `INFO`
//! 3. gzip response compression
//! 4. CORS, allowing only the methods the router serves
//! 5. JSON body size limit
//! 6. request timeout (`408`)
//! 7. request id copied onto the response

use axum::extract::DefaultBodyLimit;
use axum::http::header::{HeaderName, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::config::NetworkConfig;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps `router` in the transport middleware. `methods` are the HTTP
/// methods the router's routes answer; CORS preflights allow exactly those.
pub fn apply_http_layers<S>(router: Router<S>, config: &NetworkConfig, methods: &[Method]) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.cors_origins, methods, request_id.clone()))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// A `*` entry allows any origin; otherwise unparseable origins are skipped.
fn cors_layer(origins: &[String], methods: &[Method], request_id: HeaderName) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(methods.to_vec())
        .allow_headers([CONTENT_TYPE, request_id.clone()])
        .expose_headers([request_id])
}

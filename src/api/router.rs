use std::time::Duration;

use axum::extract::MatchedPath;
use axum::http::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderName, Method, Request, Response};
use axum::routing::get;
use axum::Router;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::api::errors::ApiError;
use crate::api::{admin, generation, handlers, quizzes};
use crate::core::{config::Settings, state::AppState};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Everything mounted under the configured API prefix.
fn api_routes() -> Router<AppState> {
    generation::router().nest("/quizzes", quizzes::router()).nest("/admin", admin::router())
}

pub(crate) fn router(state: AppState) -> Router {
    let api_prefix = state.settings().api().api_prefix.clone();
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str)
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                route,
                request_id = %request_id
            )
        })
        .on_response(|response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            let status_label = response.status().as_u16().to_string();
            metrics::counter!("http_requests_total", "status" => status_label.clone()).increment(1);
            metrics::histogram!("http_request_duration_seconds", "status" => status_label)
                .record(latency.as_secs_f64());
        })
        .on_failure(|failure: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
            tracing::warn!(%failure, latency_ms = latency.as_millis() as u64, "Request failed");
        });

    let mut router: Router<AppState> = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz).head(handlers::healthz));

    router = if api_prefix.is_empty() {
        router.merge(api_routes())
    } else {
        router.nest(&api_prefix, api_routes())
    };

    if state.settings().telemetry().prometheus_enabled {
        router = router.route("/metrics", get(handlers::metrics));
    }

    router
        .fallback(|| async { ApiError::NotFound("Not Found".to_string()) })
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(trace_layer)
        .layer(build_cors_layer(state.settings()))
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins = settings
        .cors()
        .origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            ORIGIN,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        // Browsers need these to read the download name and the stored paper id.
        .expose_headers([
            CONTENT_DISPOSITION,
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static(generation::PAPER_ID_HEADER),
        ])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_credentials(true).allow_origin(AllowOrigin::list(origins))
    }
}

//! Per-request span, request id, metrics and outcome logging.

mod parent_context;
mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use storefront_app::auth::Identity;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());
    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let names = spans::request_span_name(&method, req.uri().path());
    let _in_flight = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %names.otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        route = %names.otel_path,
        remote_addr = %req.remote_addr(),
        user_uuid = tracing::field::Empty,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    if settings::otel_parent_propagation_enabled()
        && let Some(parent_context) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent_context)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    // Set by the auth middleware on protected routes.
    if let Ok(identity) = depot.obtain::<Identity>() {
        span.record("user_uuid", tracing::field::display(identity.user_uuid));
    }

    let duration = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);

    metrics::observe_request(
        &method,
        &names.otel_path,
        status.as_u16(),
        duration.as_secs_f64(),
    );

    span.record("status", status.as_u16());
    span.record("duration_ms", duration.as_millis());

    span.in_scope(|| log_outcome(status, duration.as_millis()));
}

fn log_outcome(status: StatusCode, duration_ms: u128) {
    let threshold_ms = u128::from(settings::slow_request_threshold_ms());

    if status.is_server_error() {
        error!(status = status.as_u16(), duration_ms, "request.failed");
    } else if status.is_client_error() {
        warn!(status = status.as_u16(), duration_ms, "request.rejected");
    } else {
        info!(status = status.as_u16(), duration_ms, "request.completed");
    }

    if duration_ms > threshold_ms {
        warn!(duration_ms, threshold_ms, "slow request");
    }
}

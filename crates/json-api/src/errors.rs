//! JSON error bodies.
//!
//! Handlers fail with [`StatusError`]; the catcher installed on the service rewrites every error
//! response, including router and panic failures, into an [`ErrorResponse`].

use salvo::{catcher::Catcher, http::ResBody, oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Human readable description of the failure
    pub error: String,
}

#[salvo::handler]
pub(crate) async fn json_errors(res: &mut Response, ctrl: &mut FlowCtrl) {
    let status = res.status_code.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if !status.is_client_error() && !status.is_server_error() {
        return;
    }

    let error = match std::mem::replace(&mut res.body, ResBody::None) {
        ResBody::Error(error) if !error.brief.is_empty() => error.brief,
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string(),
    };

    res.status_code(status);
    res.render(Json(ErrorResponse { error }));

    ctrl.skip_rest();
}

/// Wrap a router in a service whose failures render as JSON.
pub(crate) fn service(router: Router) -> Service {
    Service::new(router).catcher(Catcher::default().hoop(json_errors))
}

use crate::state::AppState;
use axum::{
    debug_handler,
    extract::{OriginalUri, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, RequestExt,
};
use metrics::counter;
use serde_json::json;
use weka_federation::Outcome;

/// Accept a single activity delivery
///
/// The peer only ever learns "ok" or "bad request". The actual
/// rejection reason stays in the logs.
#[debug_handler]
pub async fn post(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> Response {
    // Axum cuts the "/users" part out of the URI due to the nesting,
    // but the peer signed the full request-target
    let (mut parts, body) = req.with_limited_body().into_parts();
    parts.uri = original_uri;

    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(error) => {
            debug!(?error, "failed to buffer body");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    counter!("received_activities").increment(1);

    match state.pipeline.authenticate(&parts, &body).await {
        Outcome::Trusted(actor_id) => {
            debug!(%actor_id, "accepted inbox delivery");
            Json(json!({ "status": "ok" })).into_response()
        }
        Outcome::Rejected(reason) => {
            info!(?reason, "rejected inbox delivery");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

//! HTTP boundary: routing, webhook admission checks, and the opaque error
//! responses callers see. Everything the operator needs to debug a rejected
//! delivery goes to the logs, not to the wire.

use axum::{
    Json,
    Router,
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::SharedState;
use crate::dispatch::{self, DeployAck};
use crate::error::{DeployError, Result};
use crate::repo::RepoRef;
use crate::signature::verify_signature;
use crate::webhook::{HOOKSHOT_UA_PREFIX, PushEvent, WebhookRequest};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/webhook", post(handle_webhook))
        .with_state(state)
}

/// Returns server identity and uptime.
pub async fn healthz(AxumState(state): AxumState<SharedState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

/// Handles the GitHub webhook POST request.
///
/// The response is deliberately terse: a status code and a generic message.
/// Callers are not told which admission check failed.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = WebhookRequest::from_parts(&headers, body);
    let delivery = request.delivery.clone().unwrap_or_else(|| "-".to_string());

    match process_delivery(&state, &request).await {
        Ok(ack) => {
            info!(
                delivery = %delivery,
                repo = %ack.repository,
                deploy_id = %ack.deploy_id,
                "webhook handled"
            );
            (StatusCode::OK, Json(ack)).into_response()
        }
        Err(e) => {
            let status = error_status(&e);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!(delivery = %delivery, error = %e, "deploy failed");
            } else {
                warn!(delivery = %delivery, error = %e, "webhook rejected");
            }
            (status, Json(json!({"error": error_message(status)}))).into_response()
        }
    }
}

/// Runs the full admission pipeline, then the deploy itself.
///
/// Checks run cheapest-first: User-Agent, then signature, and only then is
/// the body parsed. An unverified body is never deserialized.
async fn process_delivery(state: &SharedState, request: &WebhookRequest) -> Result<DeployAck> {
    let from_github = request
        .user_agent
        .as_deref()
        .is_some_and(|ua| ua.starts_with(HOOKSHOT_UA_PREFIX));
    if !from_github {
        return Err(DeployError::Unauthorized("missing or foreign User-Agent"));
    }

    let Some(secret) = state.webhook_secret.as_deref() else {
        warn!("GITHUB_WEBHOOK_SECRET is not set, rejecting delivery");
        return Err(DeployError::Unauthorized("no webhook secret configured"));
    };
    let signature = request
        .signature
        .as_deref()
        .ok_or(DeployError::Unauthorized("missing signature header"))?;
    if !verify_signature(&request.body, secret, signature) {
        return Err(DeployError::Unauthorized("signature mismatch"));
    }

    let event = request
        .event
        .as_deref()
        .ok_or_else(|| DeployError::InvalidPayload("missing event header".to_string()))?;
    let payload: PushEvent = serde_json::from_slice(&request.body)
        .map_err(|e| DeployError::InvalidPayload(format!("malformed payload: {}", e)))?;
    let repo = RepoRef::new(payload.repository.owner.login, payload.repository.name)?;

    dispatch::handle_event(state, event, &repo).await
}

fn error_status(error: &DeployError) -> StatusCode {
    match error {
        DeployError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DeployError::InvalidPayload(_) | DeployError::UnsupportedEvent(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::BAD_REQUEST => "bad request",
        _ => "deployment failed",
    }
}

//! HTTP handlers for the provider webhook endpoints.
//!
//! These endpoints take no session and no CSRF token. Authentication is the
//! provider signature, checked inside the application handlers; here we only
//! pull the raw material (source IP, body, signature header or form field)
//! out of the request.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use crate::application::handlers::webhook::{
    ProcessMeridianWebhookCommand, ProcessNovapayWebhookCommand,
};
use crate::domain::payment::WebhookError;

use super::super::AppState;
use super::dto::{MeridianAckResponse, NovapayAckResponse, NovapayWebhookForm, WebhookErrorResponse};

pub const MERIDIAN_SIGNATURE_HEADER: &str = "x-meridian-signature";

/// Source IP of the delivery: first entry of `X-Forwarded-For` when the
/// proxy set one, otherwise the peer address.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_else(|| peer.ip())
}

/// POST /webhooks/novapay
pub async fn handle_novapay_webhook(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(form): Form<NovapayWebhookForm>,
) -> Response {
    let cmd = ProcessNovapayWebhookCommand {
        source_ip: client_ip(&headers, peer),
        data: form.data,
        signature: form.signature,
    };

    match state.novapay_webhook.handle(cmd).await {
        Ok(_) => Json(NovapayAckResponse::ok()).into_response(),
        Err(e) => reject(e),
    }
}

/// POST /webhooks/meridian
pub async fn handle_meridian_webhook(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Response {
    let signature = headers
        .get(MERIDIAN_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = ProcessMeridianWebhookCommand {
        source_ip: client_ip(&headers, peer),
        body: body.to_vec(),
        signature,
    };

    match state.meridian_webhook.handle(cmd).await {
        Ok(_) => Json(MeridianAckResponse { received: true }).into_response(),
        Err(e) => reject(e),
    }
}

fn reject(error: WebhookError) -> Response {
    let status = error.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %error, "webhook processing failed");
    } else {
        tracing::warn!(error = %error, status = %status, "webhook rejected");
    }
    (
        status,
        Json(WebhookErrorResponse {
            error: error.client_message(),
        }),
    )
        .into_response()
}

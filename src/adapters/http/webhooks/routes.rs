//! Axum router for the provider webhook endpoints.

use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::post;
use axum::Router;

use super::super::AppState;
use super::handlers::{handle_meridian_webhook, handle_novapay_webhook};

/// Every webhook response, success or rejection, carries no-store and
/// anti-indexing headers.
async fn security_headers(request: axum::extract::Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    headers.insert("x-robots-tag", HeaderValue::from_static("noindex, nofollow"));
    response
}

/// Create the webhook router.
///
/// # Routes
/// - `POST /novapay` - NovaPay callbacks (form-encoded, signed blob)
/// - `POST /meridian` - Meridian callbacks (raw JSON, signature header)
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/novapay", post(handle_novapay_webhook))
        .route("/meridian", post(handle_meridian_webhook))
        .layer(middleware::from_fn(security_headers))
}

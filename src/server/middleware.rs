//! HTTP middleware for the emulator.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

use super::error::{error_body, PendingError};

/// Request id header, as sent by Route53.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-amzn-requestid");

/// Request id extension type.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Assigns every request an id, echoes it in the `x-amzn-RequestId` header
/// and writes it into error documents.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));
    Span::current().record("request_id", request_id.as_str());

    let mut response = next.run(request).await;

    if let Some(PendingError(mut document)) = response.extensions_mut().remove::<PendingError>() {
        document.request_id = request_id.clone();
        let status = response.status();
        response = error_body(status, &document);
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

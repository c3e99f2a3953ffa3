use axum::{
    extract::rejection::{BytesRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::backend::BackendError;
use crate::xml::{render_error_response, ErrorDocument, XmlError};

/// Errors returned by the HTTP handlers, rendered as Route53 `ErrorResponse`
/// documents.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("{0}")]
    InvalidInput(String),

    #[error("no operation matches {method} {path}")]
    UnknownOperation { method: String, path: String },

    #[error("internal error: {0}")]
    Internal(String),
}

/// An error document waiting for its request id; filled in by the request
/// id middleware.
#[derive(Debug, Clone)]
pub(crate) struct PendingError(pub ErrorDocument);

impl ApiError {
    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Backend(err) => {
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ApiError::Xml(XmlError::Serialize(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Xml(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownOperation { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// Route53 error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Backend(err) => err.code(),
            ApiError::Xml(XmlError::Serialize(_)) | ApiError::Internal(_) => "InternalFailure",
            ApiError::Xml(XmlError::Deserialize(_) | XmlError::Parse(_)) => "MalformedInput",
            ApiError::Xml(_) | ApiError::InvalidInput(_) => "InvalidInput",
            ApiError::UnknownOperation { .. } => "UnknownOperation",
        }
    }

    /// `Sender` for client faults, `Receiver` for server faults.
    pub fn error_type(&self) -> &'static str {
        if self.status().is_server_error() {
            "Receiver"
        } else {
            "Sender"
        }
    }

    pub(crate) fn document(&self, request_id: &str) -> ErrorDocument {
        ErrorDocument {
            error_type: self.error_type().to_string(),
            code: self.code().to_string(),
            message: self.to_string(),
            request_id: request_id.to_string(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidInput(format!("Invalid path: {}", rejection.body_text()))
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Renders an error document, falling back to a bare status when even that
/// fails.
pub(crate) fn error_body(status: StatusCode, document: &ErrorDocument) -> Response {
    match render_error_response(document) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("text/xml"))],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to render error response");
            status.into_response()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
        } else {
            warn!(code = self.code(), error = %self, "request rejected");
        }

        let document = self.document("");
        let mut response = error_body(status, &document);
        response.extensions_mut().insert(PendingError(document));
        response
    }
}

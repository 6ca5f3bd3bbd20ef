use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pothole_core::error::CoreError;
use pothole_core::wire::AckEnvelope;

/// Shown instead of the real message for anything that maps to 500.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Handler error. Every variant renders as a `{success: false, message, code}`
/// envelope so clients can show the message verbatim.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed form or multipart body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A named file (saved collection, board image) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The requested capability is not compiled into this build.
    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl AppError {
    /// Status, machine-readable code and the message sent to the client.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string())
            }
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unsupported(msg) => {
                (StatusCode::NOT_IMPLEMENTED, "NOT_SUPPORTED", msg.clone())
            }
            AppError::Core(CoreError::Internal(_)) | AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(%status, code, message = %message, "Request rejected");
        }
        (status, axum::Json(AckEnvelope::failure(message, code))).into_response()
    }
}

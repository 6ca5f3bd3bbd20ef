//! Request handlers for the authority routes.
//!
//! Every handler answers with a `{success, ...}` envelope; failures go
//! through [`AppError`](crate::error::AppError) so they carry a message and a
//! code.

pub mod files;
pub mod image;
pub mod potholes;
pub mod report;
pub mod transfer;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, AppResult};

/// Binary download with `Content-Disposition: attachment`.
pub(crate) fn attachment(filename: &str, content_type: &'static str, bytes: Vec<u8>) -> AppResult<Response> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| AppError::BadRequest(format!("Invalid download name: {e}")))?;
    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

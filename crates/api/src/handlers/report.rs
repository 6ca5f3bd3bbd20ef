//! PDF report download.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Form;
use pothole_core::naming::validate_collection_name;
use pothole_core::wire::FilenameForm;

use crate::error::{AppError, AppResult};
use crate::handlers::attachment;
use crate::report::{render_pdf, reports_enabled, ReportInput, PDF_CONTENT_TYPE};
use crate::state::AppState;

/// POST /generate_pdf
///
/// Build a report of the in-memory collection, embedding the last stored
/// board image when there is one.
pub async fn generate_pdf(
    State(state): State<AppState>,
    form: Result<Form<FilenameForm>, FormRejection>,
) -> AppResult<Response> {
    let Form(form) = form?;
    let name = validate_collection_name(&form.filename)?.to_string();

    if !reports_enabled() {
        return Err(AppError::Unsupported(
            "PDF reports are not enabled in this build".into(),
        ));
    }

    let board_image = if state.files.has_board_image().await {
        Some(state.files.board_image_path())
    } else {
        tracing::warn!("No board image stored; report will omit it");
        None
    };

    let input = {
        let collection = state.collection.read().await;
        ReportInput {
            records: collection.records().to_vec(),
            summary: collection.summary(),
            board_image,
        }
    };
    let fonts = state.config.report_fonts();

    let count = input.records.len();
    let pdf = tokio::task::spawn_blocking(move || render_pdf(&input, &fonts))
        .await
        .map_err(|e| AppError::InternalError(format!("Report task failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("Report rendering failed: {e}")))?;

    tracing::info!(name = %name, count, bytes = pdf.len(), "Report generated");
    attachment(&format!("{name}.pdf"), PDF_CONTENT_TYPE, pdf)
}

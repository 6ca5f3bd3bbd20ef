//! Spreadsheet export and import.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::FormRejection;
use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::{Form, Json};
use pothole_core::naming::validate_collection_name;
use pothole_core::wire::{decode_potholes, CollectionForm, TransferEnvelope, IMPORT_FIELD};

use crate::error::{AppError, AppResult};
use crate::handlers::attachment;
use crate::spreadsheet::{read_spreadsheet, write_xlsx, XLSX_CONTENT_TYPE, XLSX_EXTENSION};
use crate::state::AppState;

/// POST /export_potholes
///
/// Render the records sent by the client as an Excel download.
pub async fn export_potholes(
    form: Result<Form<CollectionForm>, FormRejection>,
) -> AppResult<Response> {
    let Form(form) = form?;
    let name = validate_collection_name(&form.filename)?;
    let records = decode_potholes(&form.potholes)?;
    let bytes = write_xlsx(&records)?;

    tracing::info!(name, count = records.len(), "Collection exported");
    attachment(&format!("{name}.{XLSX_EXTENSION}"), XLSX_CONTENT_TYPE, bytes)
}

/// POST /import_potholes
///
/// Replace the in-memory collection with the rows of an uploaded xlsx or CSV
/// file (multipart field `file`).
pub async fn import_potholes(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<TransferEnvelope>> {
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMPORT_FIELD) {
            let filename = field.file_name().unwrap_or("upload").to_string();
            upload = Some((filename, field.bytes().await?));
            break;
        }
    }
    let (filename, bytes) = upload
        .ok_or_else(|| AppError::BadRequest(format!("Missing multipart field '{IMPORT_FIELD}'")))?;

    let records = read_spreadsheet(&bytes)?;

    let mut collection = state.collection.write().await;
    collection.replace(records);

    tracing::info!(filename = %filename, count = collection.len(), "Collection imported");
    Ok(Json(TransferEnvelope::transfer(
        collection.records(),
        collection.summary(),
    )?))
}

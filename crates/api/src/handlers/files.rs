//! Save and load named collections.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::{Form, Json};
use pothole_core::wire::{decode_potholes, AckEnvelope, CollectionForm, FilenameForm, TransferEnvelope};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /save_potholes
///
/// Persist the records sent by the client (positions included). The
/// in-memory collection is not touched.
pub async fn save_potholes(
    State(state): State<AppState>,
    form: Result<Form<CollectionForm>, FormRejection>,
) -> AppResult<Json<AckEnvelope>> {
    let Form(form) = form?;
    let records = decode_potholes(&form.potholes)?;
    let path = state.files.save_collection(&form.filename, &records).await?;

    tracing::info!(path = %path.display(), count = records.len(), "Collection saved");
    Ok(Json(AckEnvelope::ok()))
}

/// POST /load_potholes
///
/// Replace the in-memory collection with a saved one. `potholes` in the
/// response is a JSON string.
pub async fn load_potholes(
    State(state): State<AppState>,
    form: Result<Form<FilenameForm>, FormRejection>,
) -> AppResult<Json<TransferEnvelope>> {
    let Form(form) = form?;
    let records = state.files.load_collection(&form.filename).await?;

    let mut collection = state.collection.write().await;
    collection.replace(records);

    tracing::info!(name = %form.filename.trim(), count = collection.len(), "Collection loaded");
    Ok(Json(TransferEnvelope::transfer(
        collection.records(),
        collection.summary(),
    )?))
}

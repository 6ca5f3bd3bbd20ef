//! Mutations of the in-memory collection.
//!
//! Each handler answers with the whole updated collection and its summary.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::{Form, Json};
use pothole_core::collection::Collection;
use pothole_core::pothole::Dimensions;
use pothole_core::wire::{parse_index, AddForm, MutationEnvelope, RemoveForm, UpdateForm};

use crate::error::AppResult;
use crate::state::AppState;

fn echo(collection: &Collection) -> Json<MutationEnvelope> {
    Json(MutationEnvelope::collection(
        collection.records().to_vec(),
        collection.summary(),
    ))
}

/// POST /add_pothole
///
/// Append a record, or insert it at the 0-based `index` when one is given.
pub async fn add_pothole(
    State(state): State<AppState>,
    form: Result<Form<AddForm>, FormRejection>,
) -> AppResult<Json<MutationEnvelope>> {
    let Form(form) = form?;
    let dimensions = Dimensions::parse(&form.width, &form.length)?;
    // An empty `index` field means append.
    let index = form
        .index
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_index)
        .transpose()?;

    let mut collection = state.collection.write().await;
    match index {
        Some(index) => collection.insert(index, dimensions)?,
        None => collection.append(dimensions),
    }

    tracing::info!(
        width = dimensions.width,
        length = dimensions.length,
        index = ?index,
        count = collection.len(),
        "Pothole added",
    );
    Ok(echo(&collection))
}

/// POST /update_pothole
///
/// Replace the measurement of an existing record.
pub async fn update_pothole(
    State(state): State<AppState>,
    form: Result<Form<UpdateForm>, FormRejection>,
) -> AppResult<Json<MutationEnvelope>> {
    let Form(form) = form?;
    let index = parse_index(&form.index)?;
    let dimensions = Dimensions::parse(&form.width, &form.length)?;

    let mut collection = state.collection.write().await;
    collection.update(index, dimensions)?;

    tracing::info!(index, width = dimensions.width, length = dimensions.length, "Pothole updated");
    Ok(echo(&collection))
}

/// POST /remove_pothole
pub async fn remove_pothole(
    State(state): State<AppState>,
    form: Result<Form<RemoveForm>, FormRejection>,
) -> AppResult<Json<MutationEnvelope>> {
    let Form(form) = form?;
    let index = parse_index(&form.index)?;

    let mut collection = state.collection.write().await;
    let removed = collection.remove(index)?;

    tracing::info!(index, area = removed.area, count = collection.len(), "Pothole removed");
    Ok(echo(&collection))
}

/// POST /reset
pub async fn reset(State(state): State<AppState>) -> AppResult<Json<MutationEnvelope>> {
    let mut collection = state.collection.write().await;
    let cleared = collection.len();
    collection.clear();

    tracing::info!(cleared, "Collection reset");
    Ok(echo(&collection))
}

//! Board image storage.

use std::io::Cursor;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::{Form, Json};
use image::{DynamicImage, ImageFormat};
use pothole_core::wire::{decode_data_url, AckEnvelope, ImageForm};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Decode a PNG, drop any alpha channel and re-encode it.
///
/// The PDF backend only embeds images without transparency.
pub fn flatten_png(bytes: &[u8]) -> AppResult<(u32, u32, Vec<u8>)> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| AppError::BadRequest(format!("image_data is not a PNG image: {e}")))?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| AppError::InternalError(format!("Failed to encode board image: {e}")))?;
    Ok((rgb.width(), rgb.height(), out.into_inner()))
}

/// POST /save_road_image
///
/// Store the rendered board (a PNG data URL) for later reports.
pub async fn save_road_image(
    State(state): State<AppState>,
    form: Result<Form<ImageForm>, FormRejection>,
) -> AppResult<Json<AckEnvelope>> {
    let Form(form) = form?;
    let bytes = decode_data_url(&form.image_data)?;
    let (width, height, png) = tokio::task::spawn_blocking(move || flatten_png(&bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("Image task failed: {e}")))??;

    let path = state.files.save_board_image(&png).await?;

    tracing::debug!(path = %path.display(), width, height, "Board image stored");
    Ok(Json(AckEnvelope::ok()))
}

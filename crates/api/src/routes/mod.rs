pub mod health;

use axum::routing::post;
use axum::Router;
use pothole_core::wire::routes;

use crate::handlers;
use crate::state::AppState;

/// Build the authority route tree.
///
/// Route hierarchy (all `POST`, form-encoded unless noted):
///
/// ```text
/// /add_pothole                 append or insert-at (optional index)
/// /update_pothole              replace a measurement
/// /remove_pothole              remove by index
/// /reset                       clear the collection
/// /save_potholes               persist a named collection
/// /load_potholes               replace the collection from a saved one
/// /export_potholes             xlsx download
/// /import_potholes             replace the collection from xlsx or CSV (multipart)
/// /save_road_image             store the rendered board (data URL)
/// /generate_pdf                PDF download
/// ```
pub fn authority_routes() -> Router<AppState> {
    Router::new()
        .route(routes::ADD, post(handlers::potholes::add_pothole))
        .route(routes::UPDATE, post(handlers::potholes::update_pothole))
        .route(routes::REMOVE, post(handlers::potholes::remove_pothole))
        .route(routes::RESET, post(handlers::potholes::reset))
        .route(routes::SAVE, post(handlers::files::save_potholes))
        .route(routes::LOAD, post(handlers::files::load_potholes))
        .route(routes::EXPORT, post(handlers::transfer::export_potholes))
        .route(routes::IMPORT, post(handlers::transfer::import_potholes))
        .route(routes::STORE_IMAGE, post(handlers::image::save_road_image))
        .route(routes::REPORT, post(handlers::report::generate_pdf))
}

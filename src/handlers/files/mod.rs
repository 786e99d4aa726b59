//! File upload handlers

mod handler;

pub use handler::*;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handler::list_files).post(handler::upload_file))
        .route("/files/new", get(handler::new_file))
        .route("/files/{file_id}", get(handler::show_file).delete(handler::delete_file))
        .route("/files/{file_id}/download", get(handler::download_file))
}

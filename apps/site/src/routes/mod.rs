pub mod contact;
pub mod criteria;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/contact", post(contact::handle_contact))
        .route(
            "/api/criteria",
            post(criteria::handle_criteria_upload)
                .layer(DefaultBodyLimit::max(criteria::MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/criteria/document",
            post(criteria::handle_render_document),
        )
        .with_state(state)
}

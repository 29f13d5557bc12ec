mod handlers;
mod helpers;

use axum::{routing::post, Router};

use crate::core::state::AppState;

pub(crate) use helpers::PAPER_ID_HEADER;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-mcq-key", post(handlers::generate_mcq_key))
        .route("/generate-paper", post(handlers::generate_paper))
}

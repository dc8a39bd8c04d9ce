use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod pipeline;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/news/stream", post(handlers::stream_news))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::pipeline::{run_pipeline, EventSink, StreamParams};
    pub use crate::AppState;
    pub use nb_core::{Article, Error, Result, StreamEvent, SummarizedArticle};
}

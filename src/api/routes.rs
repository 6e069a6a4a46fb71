use axum::{
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{propagate_request_id, request_span};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/status", get(handlers::status))
        // Catalog
        .route("/movies", get(handlers::list_movies))
        .route("/movies", post(handlers::create_movie))
        .route("/movies", delete(handlers::delete_movie))
        .route("/movies/search", get(handlers::search_movies))
        .route("/movies/:id", get(handlers::get_movie))
        // Recommendations
        .route("/recommendations", get(handlers::browse_recommendations))
        .route("/recommendations/:id", get(handlers::recommendations_for))
        // Catalog metadata
        .route("/genres", get(handlers::list_genres))
        .route("/stats", get(handlers::stats))
        .route("/export", get(handlers::export_catalog));

    // Request IDs are assigned outside the trace layer so every span
    // carries one; CORS wraps everything to catch preflights
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(from_fn(propagate_request_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

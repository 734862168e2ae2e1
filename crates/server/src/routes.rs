//! Route configuration.

use crate::auth::session_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check (intentionally unauthenticated for load balancers/k8s probes)
        .route("/v1/health", get(handlers::health_check))
        // Catalog mirror
        .route("/v1/books", post(handlers::mirror_book))
        .route("/v1/books/{book_id}", get(handlers::get_book))
        .route(
            "/v1/books/{book_id}/reviews",
            get(handlers::list_book_reviews),
        )
        // Shelf management
        .route(
            "/v1/shelf",
            put(handlers::update_shelf).get(handlers::list_shelf),
        )
        // Review ledger
        .route("/v1/reviews", put(handlers::update_review))
        // Catalog proxy
        .route("/v1/catalog/search", get(handlers::search_catalog))
        .route(
            "/v1/catalog/volumes/{catalog_id}",
            get(handlers::get_catalog_volume),
        );

    // Middleware layers are applied in reverse order (outermost first).
    // Order of execution: TraceLayer -> Session -> Handler
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

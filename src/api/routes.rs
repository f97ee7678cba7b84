//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_person, delete_person, get_person, list_people, live, metrics_handler, ready, AppState,
};

/// Create the API router.
///
/// Health and metrics routes are only mounted when the state carries
/// checks or a render handle.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // People endpoints
        .route("/people", get(list_people))
        .route(
            "/people/:id",
            get(get_person).post(create_person).delete(delete_person),
        );

    // Health endpoints
    if state.health.is_some() {
        router = router.route("/live", get(live)).route("/ready", get(ready));
    }

    // Metrics endpoint
    if state.metrics.is_some() {
        router = router.route("/metrics", get(metrics_handler));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

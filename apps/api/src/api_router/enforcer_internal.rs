use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_enforcer_internal_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/internal/enforcer/pending",
            get(handlers::enforcer::pending_entries_handler),
        )
        .route(
            "/api/internal/enforcer/logs/{id}/handled",
            post(handlers::enforcer::mark_handled_handler),
        )
        .route_layer(from_fn_with_state(
            app_state,
            middleware::require_enforcer_auth,
        ))
}

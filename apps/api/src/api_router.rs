use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};
use warden_core::AppError;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;
mod enforcer_internal;

use cors::build_cors_layer;
use enforcer_internal::build_enforcer_internal_routes;


pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/actions",
            post(handlers::moderation::submit_action_handler),
        )
        .route("/api/logs", get(handlers::moderation::list_logs_handler))
        .route(
            "/api/logs/{id}",
            delete(handlers::moderation::delete_log_handler)
                .patch(handlers::moderation::correct_log_handler),
        )
        .route(
            "/api/ban-requests",
            get(handlers::ban_requests::list_ban_requests_handler)
                .post(handlers::ban_requests::submit_ban_request_handler),
        )
        .route(
            "/api/ban-requests/{id}/approve",
            post(handlers::ban_requests::approve_ban_request_handler),
        )
        .route(
            "/api/ban-requests/{id}/deny",
            post(handlers::ban_requests::deny_ban_request_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    // Cookie-authenticated routes. The enforcer authenticates with a bearer
    // token and sends no Origin header, so it is merged after this layer.
    let browser_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ));

    Ok(Router::new()
        .merge(browser_routes)
        .merge(build_enforcer_internal_routes(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}

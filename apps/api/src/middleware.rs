use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tower_sessions::Session;
use warden_core::{AppError, StaffIdentity};

use crate::auth::SESSION_STAFF_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Loads the staff identity from the session into request extensions.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<StaffIdentity>(SESSION_STAFF_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthenticated("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Rejects cookie-authenticated mutations that do not come from the
/// dashboard origin.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if headers.get("sec-fetch-site") == Some(&HeaderValue::from_static("cross-site")) {
            return Err(AppError::Forbidden("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !is_allowed_origin(&state.frontend_url, origin, referer) {
            return Err(AppError::Forbidden("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

/// Guards internal routes used by the enforcement relay.
pub async fn require_enforcer_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthenticated("enforcer token required".to_owned()))?;

    if !secrets_match(presented, &state.enforcer_shared_secret) {
        return Err(AppError::Unauthenticated("invalid enforcer token".to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn is_allowed_origin(frontend_url: &str, origin: &str, referer: &str) -> bool {
    if origin == frontend_url {
        return true;
    }

    // Referer must be the origin itself or a path below it, not a longer host.
    referer
        .strip_prefix(frontend_url)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn secrets_match(presented: &str, expected: &str) -> bool {
    if presented.len() != expected.len() {
        return false;
    }

    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

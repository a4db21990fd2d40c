//! Authentication and authorization gate.
//!
//! ```text
//! request ──► require_auth ──► require_admin ──► handler
//!               │                  │
//!               │ 401              │ 403 (role != admin)
//!               ▼                  ▼ 401 (no CurrentUser)
//!          {"message"}        {"message"}
//! ```
//!
//! The checks live in [`authenticate`] and [`authorize_admin`]; the axum
//! middleware functions only adapt them to the request pipeline.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use storefront_core::User;
use tracing::warn;

use crate::auth::extract_bearer_token;
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated account, attached to request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolves the bearer token in `headers` to a stored user.
///
/// The role comes from the database row, not from the token claims.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| {
            warn!("Request rejected: token missing");
            ApiError::Unauthorized("Token missing".to_string())
        })?;

    let claims = state.tokens.validate(token).map_err(|reason| {
        warn!(%reason, "Request rejected: invalid token");
        ApiError::from(reason)
    })?;

    let user_id = claims.user_id()?;
    match state.db.users().get_by_id(user_id).await? {
        Some(user) => Ok(CurrentUser(user)),
        None => {
            warn!(user_id, "Request rejected: user not found");
            Err(ApiError::Unauthorized("User not found".to_string()))
        }
    }
}

/// Admits only administrators. A missing user means the auth stage never
/// ran, which is treated as unauthenticated.
pub fn authorize_admin(user: Option<&CurrentUser>) -> Result<(), ApiError> {
    match user {
        None => Err(ApiError::Unauthorized("Token missing".to_string())),
        Some(CurrentUser(user)) if user.role.is_admin() => Ok(()),
        Some(CurrentUser(user)) => {
            warn!(user_id = user.id, "Request rejected: admin only");
            Err(ApiError::Forbidden("Forbidden - admin only".to_string()))
        }
    }
}

/// Middleware requiring a valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Middleware requiring an admin. Must run after [`require_auth`].
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, ApiError> {
    authorize_admin(request.extensions().get::<CurrentUser>())?;
    Ok(next.run(request).await)
}

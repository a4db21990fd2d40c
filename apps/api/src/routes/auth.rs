//! Account registration and login.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use storefront_core::validation::{validate_email, validate_password};
use storefront_core::{Role, User};
use storefront_db::{hash_password, DbError, NewUser, UserCredentials};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The account fields returned alongside a token.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (Some(email), Some(password)) = (non_empty(body.email), non_empty(body.password)) else {
        return Err(ApiError::BadRequest("Missing fields".to_string()));
    };

    let email = validate_email(&email)?;
    validate_password(&password)?;

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let user = state
        .db
        .users()
        .create(NewUser {
            email,
            name: body.name.unwrap_or_default().trim().to_string(),
            password_hash,
            role: Role::User,
        })
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => ApiError::BadRequest("Email already exists".to_string()),
            other => other.into(),
        })?;

    let token = state.tokens.issue(&user)?;
    info!(user_id = user.id, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserView::from(&user),
            token,
        }),
    ))
}

/// Looks up and checks credentials. `None` for an unknown email or a wrong
/// password alike.
async fn check_credentials(state: &AppState, body: LoginRequest) -> ApiResult<Option<User>> {
    let Some(email) = non_empty(body.email) else {
        return Ok(None);
    };
    let password = body.password.unwrap_or_default();

    let Some(credentials) = state.db.users().get_credentials(&email).await? else {
        return Ok(None);
    };

    let verified = tokio::task::spawn_blocking(move || {
        let ok = credentials.verify(&password);
        (ok, credentials)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(match verified {
        (true, UserCredentials { user, .. }) => Some(user),
        (false, _) => None,
    })
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let Some(user) = check_credentials(&state, body).await? else {
        warn!("Login rejected");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let token = state.tokens.issue(&user)?;
    info!(user_id = user.id, "Login");

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        token,
    }))
}

/// `POST /api/admin/login`
pub async fn admin_login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = match check_credentials(&state, body).await? {
        Some(user) if user.role.is_admin() => user,
        _ => {
            warn!("Admin login rejected");
            return Err(ApiError::Unauthorized(
                "Invalid admin credentials".to_string(),
            ));
        }
    };

    let token = state.tokens.issue(&user)?;
    info!(user_id = user.id, "Admin login");

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        token,
    }))
}

//! Handlers for the `/auth` resource (register, login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use mediatrack_core::accounts::{
    normalize_email, normalize_name, validate_email, MAX_ACTIVE_SESSIONS, MIN_PASSWORD_LEN,
};
use mediatrack_core::types::DbId;
use mediatrack_db::models::session::CreateSession;
use mediatrack_db::models::user::{CreateUser, User, UserResponse};
use mediatrack_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Returned for both an unknown email and a wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account. The email must not already be registered.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let name = normalize_name(&input.name)?;

    let email = normalize_email(&input.email);
    validate_email(&email)?;

    validate_password_strength(&input.password, MIN_PASSWORD_LEN).map_err(AppError::validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A concurrent duplicate still loses on `uq_users_email` and maps to 409.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            name,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from_user(&user, 0),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let response = create_auth_response(&state, &user, None).await?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_REFRESH_TOKEN))?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

    // Token rotation: the presented token is single-use.
    let response = create_auth_response(&state, &user, Some(session.id)).await?;
    tracing::debug!(user_id = user.id, "Refresh token rotated");

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user: every refresh token and
/// every access token issued so far. Returns 204 No Content.
pub async fn logout(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    UserRepo::bump_token_version(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// Account info for the bearer of the access token.
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

    let data = user_response(&state, &user).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user_response(state: &AppState, user: &User) -> AppResult<UserResponse> {
    let media_count = UserRepo::media_count(&state.pool, user.id).await?;
    Ok(UserResponse::from_user(user, media_count))
}

/// Generate access + refresh tokens, persist a session row, and build the response.
///
/// With `replaces` set the new session rotates that one out; a session that
/// was already rotated or revoked yields 401.
async fn create_auth_response(
    state: &AppState,
    user: &User,
    replaces: Option<DbId>,
) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    store_session(state, user.id, refresh_hash, replaces).await?;

    let access_token = generate_access_token(user.id, &user.email, user.token_version, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: jwt.access_token_expiry_secs(),
        user: user_response(state, user).await?,
    })
}

async fn store_session(
    state: &AppState,
    user_id: DbId,
    refresh_token_hash: String,
    replaces: Option<DbId>,
) -> AppResult<()> {
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    let input = CreateSession {
        user_id,
        refresh_token_hash,
        expires_at,
    };

    match replaces {
        Some(old_id) => {
            SessionRepo::rotate(&state.pool, old_id, &input)
                .await?
                .ok_or_else(|| AppError::unauthorized(INVALID_REFRESH_TOKEN))?;
        }
        None => {
            SessionRepo::create(&state.pool, &input).await?;
        }
    }

    let pruned = SessionRepo::prune_for_user(&state.pool, user_id, MAX_ACTIVE_SESSIONS).await?;
    if pruned > 0 {
        tracing::debug!(user_id, pruned, "Pruned stale sessions");
    }
    Ok(())
}

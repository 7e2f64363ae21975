//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use mediatrack_core::types::DbId;

use mediatrack_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Besides signature and expiry, the token's `ver` claim must match the
/// user's current token version, so tokens issued before a logout stop
/// working immediately.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid Authorization format. Expected: Bearer <token>")
        })?;

        let claims = validate_token(token.trim(), &state.config.jwt)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        let current = UserRepo::token_version(&state.pool, claims.sub).await?;
        if current != Some(claims.ver) {
            tracing::debug!(user_id = claims.sub, "Rejected token from a revoked session");
            return Err(AppError::unauthorized("Invalid or expired token"));
        }

        Ok(AuthUser { user_id: claims.sub })
    }
}

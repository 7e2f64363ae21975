pub mod auth;
pub mod health;
pub mod media;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register            register (public)
/// /auth/login               login (public)
/// /auth/refresh             refresh (public)
/// /auth/logout              logout (requires auth)
/// /auth/me                  current account (requires auth)
///
/// /media                    create
/// /media/{id}               get, update (PATCH), delete
///
/// /user/medias              catalogue (?search, category, orderby)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/media", media::router())
        .nest("/user", user::router())
}

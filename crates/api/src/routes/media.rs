use axum::routing::{get, post};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`. All require auth.
///
/// ```text
/// POST   /       -> create_media
/// GET    /{id}   -> get_media
/// PATCH  /{id}   -> update_media
/// DELETE /{id}   -> delete_media
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(media::create_media)).route(
        "/{id}",
        get(media::get_media)
            .patch(media::update_media)
            .delete(media::delete_media),
    )
}

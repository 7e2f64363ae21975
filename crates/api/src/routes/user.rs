use axum::routing::get;
use axum::Router;

use crate::handlers::catalogue;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET /medias -> list_user_media (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/medias", get(catalogue::list_user_media))
}

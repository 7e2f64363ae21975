//! Handler for the caller's media catalogue (`GET /user/medias`).

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use mediatrack_core::catalogue::CatalogueParams;
use mediatrack_db::models::media::MediaResponse;
use mediatrack_db::repositories::MediaRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/user/medias?search=&category=&orderby=
///
/// List the caller's media, optionally filtered by a title substring and a
/// category, and sorted by one of the fixed `orderby` keys.
pub async fn list_user_media(
    auth: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<CatalogueParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params.map_err(|rejection| AppError::validation(rejection.body_text()))?;
    let query = params.build()?;

    let media = MediaRepo::list_for_user(&state.pool, auth.user_id, &query).await?;

    tracing::debug!(
        user_id = auth.user_id,
        count = media.len(),
        category = ?query.category,
        order = ?query.order,
        "Catalogue listed",
    );

    let data: Vec<MediaResponse> = media.into_iter().map(MediaResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

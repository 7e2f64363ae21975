//! Handlers for the `/media` resource.
//!
//! Every operation on an existing document re-checks, in order: the id is
//! well formed (400), the document exists (404), and it is in the caller's
//! ownership set (403).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediatrack_core::error::CoreError;
use mediatrack_core::media::{
    normalize_genres, normalize_title, validate_image, validate_plot, validate_progress,
    validate_release_year, EpisodeProgress, MediaCategory, MediaStatus,
};
use mediatrack_core::patch;
use mediatrack_core::rating::{stars_to_rating, validate_rating};
use mediatrack_core::types::DbId;
use mediatrack_db::models::media::{CreateMedia, Media, MediaResponse, UpdateMedia};
use mediatrack_db::repositories::{MediaRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, MediaId};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /media`.
///
/// `rating` is on the 0..=10 scale; `stars` (0..=5 in halves) is accepted
/// instead for half-star widgets.
#[derive(Debug, Deserialize)]
pub struct CreateMediaRequest {
    pub title: String,
    pub category: MediaCategory,
    pub status: MediaStatus,
    pub rating: Option<i16>,
    pub stars: Option<f32>,
    pub image: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub plot: Option<String>,
    #[serde(alias = "release_date")]
    pub release_year: Option<i32>,
    pub current_episode: Option<EpisodeProgress>,
}

/// Request body for `PATCH /media/{id}`.
///
/// Absent keys keep the stored value; `null` clears optional fields.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMediaRequest {
    #[serde(default, deserialize_with = "patch::nullable")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::nullable")]
    pub category: Option<Option<MediaCategory>>,
    #[serde(default, deserialize_with = "patch::nullable")]
    pub status: Option<Option<MediaStatus>>,
    #[serde(default, deserialize_with = "patch::nullable")]
    pub rating: Option<Option<i16>>,
    #[serde(default, deserialize_with = "patch::nullable")]
    pub stars: Option<Option<f32>>,
    #[serde(default, deserialize_with = "patch::nullable")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::nullable")]
    pub genres: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "patch::nullable")]
    pub plot: Option<Option<String>>,
    #[serde(default, alias = "release_date", deserialize_with = "patch::nullable")]
    pub release_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "patch::nullable")]
    pub current_episode: Option<Option<EpisodeProgress>>,
}

impl CreateMediaRequest {
    /// Apply the field rules and produce the insert DTO.
    pub fn into_create(self) -> Result<CreateMedia, CoreError> {
        let rating = match (self.rating, self.stars) {
            (Some(_), Some(_)) => return Err(both_rating_forms()),
            (Some(rating), None) => {
                validate_rating(rating)?;
                Some(rating)
            }
            (None, Some(stars)) => Some(stars_to_rating(stars)?),
            (None, None) => None,
        };

        if let Some(year) = self.release_year {
            validate_release_year(year)?;
        }
        if let Some(progress) = &self.current_episode {
            validate_progress(progress)?;
        }

        Ok(CreateMedia {
            title: normalize_title(&self.title)?,
            category: self.category,
            status: self.status,
            rating,
            image: clean_text(self.image, validate_image)?,
            genres: normalize_genres(&self.genres)?,
            plot: clean_text(self.plot, validate_plot)?,
            release_year: self.release_year,
            current_episode: self.current_episode,
        })
    }
}

impl UpdateMediaRequest {
    /// Apply the field rules to the provided keys and produce the update DTO.
    pub fn into_update(self) -> Result<UpdateMedia, CoreError> {
        let title = required(self.title, "title")?
            .map(|t| normalize_title(&t))
            .transpose()?;
        let category = required(self.category, "category")?;
        let status = required(self.status, "status")?;

        let rating = match (self.rating, self.stars) {
            (Some(_), Some(_)) => return Err(both_rating_forms()),
            (Some(rating), None) => {
                if let Some(r) = rating {
                    validate_rating(r)?;
                }
                Some(rating)
            }
            (None, Some(stars)) => Some(stars.map(stars_to_rating).transpose()?),
            (None, None) => None,
        };

        let image = self
            .image
            .map(|v| clean_text(v, validate_image))
            .transpose()?;
        let plot = self.plot.map(|v| clean_text(v, validate_plot)).transpose()?;

        // `null` empties the list; genres are never NULL in storage.
        let genres = self
            .genres
            .map(|v| normalize_genres(&v.unwrap_or_default()))
            .transpose()?;

        if let Some(Some(year)) = self.release_year {
            validate_release_year(year)?;
        }
        if let Some(Some(progress)) = &self.current_episode {
            validate_progress(progress)?;
        }

        Ok(UpdateMedia {
            title,
            category,
            status,
            rating,
            image,
            genres,
            plot,
            release_year: self.release_year,
            current_episode: self.current_episode,
        })
    }
}

fn both_rating_forms() -> CoreError {
    CoreError::Validation("Provide either rating or stars, not both".into())
}

/// Required fields may be omitted from a patch but not set to `null`.
fn required<T>(field: Option<Option<T>>, name: &str) -> Result<Option<T>, CoreError> {
    match field {
        Some(None) => Err(CoreError::Validation(format!("{name} cannot be null"))),
        Some(Some(value)) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Trim optional free text; blank becomes `None`.
fn clean_text(
    value: Option<String>,
    validate: fn(&str) -> Result<(), CoreError>,
) -> Result<Option<String>, CoreError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => {
            validate(text)?;
            Ok(Some(text.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/media
///
/// Create a media document and add it to the caller's list.
pub async fn create_media(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateMediaRequest>,
) -> AppResult<impl IntoResponse> {
    let create = input.into_create()?;
    let media = MediaRepo::create_for_user(&state.pool, auth.user_id, &create).await?;

    tracing::info!(
        media_id = media.id,
        user_id = auth.user_id,
        category = %create.category,
        status = %create.status,
        "Media created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MediaResponse::from(media),
        }),
    ))
}

/// GET /api/v1/media/{id}
pub async fn get_media(
    auth: AuthUser,
    State(state): State<AppState>,
    MediaId(media_id): MediaId,
) -> AppResult<impl IntoResponse> {
    let media = find_owned(&state, auth.user_id, media_id).await?;
    Ok(Json(DataResponse {
        data: MediaResponse::from(media),
    }))
}

/// PATCH /api/v1/media/{id}
///
/// Shallow partial update. `current_episode` is replaced as a whole.
pub async fn update_media(
    auth: AuthUser,
    State(state): State<AppState>,
    MediaId(media_id): MediaId,
    ApiJson(input): ApiJson<UpdateMediaRequest>,
) -> AppResult<impl IntoResponse> {
    find_owned(&state, auth.user_id, media_id).await?;

    let update = input.into_update()?;
    let media = MediaRepo::update(&state.pool, media_id, &update)
        .await?
        .ok_or_else(|| not_found(media_id))?;

    tracing::info!(media_id, user_id = auth.user_id, "Media updated");

    Ok(Json(DataResponse {
        data: MediaResponse::from(media),
    }))
}

/// DELETE /api/v1/media/{id}
pub async fn delete_media(
    auth: AuthUser,
    State(state): State<AppState>,
    MediaId(media_id): MediaId,
) -> AppResult<impl IntoResponse> {
    find_owned(&state, auth.user_id, media_id).await?;

    // Scoped to the owner, so a concurrent delete cannot remove someone else's row.
    let deleted = MediaRepo::delete_owned(&state.pool, media_id, auth.user_id).await?;
    if !deleted {
        return Err(not_found(media_id));
    }

    tracing::info!(media_id, user_id = auth.user_id, "Media deleted");

    Ok(Json(MessageResponse {
        message: "Media deleted",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Media", id })
}

/// Load a document, failing with 404 if it is missing and 403 if the caller
/// does not own it.
async fn find_owned(state: &AppState, user_id: DbId, media_id: DbId) -> AppResult<Media> {
    let media = MediaRepo::find_by_id(&state.pool, media_id)
        .await?
        .ok_or_else(|| not_found(media_id))?;

    if !UserRepo::owns_media(&state.pool, user_id, media_id).await? {
        tracing::warn!(media_id, user_id, "Media access denied");
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this media".into(),
        )));
    }

    Ok(media)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn create_body(json: serde_json::Value) -> CreateMediaRequest {
        serde_json::from_value(json).unwrap()
    }

    fn update_body(json: serde_json::Value) -> UpdateMediaRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn create_normalizes_fields() {
        let create = create_body(serde_json::json!({
            "title": "  Spirited Away ",
            "category": "anime",
            "status": "completed",
            "stars": 4.5,
            "genres": ["Fantasy", " fantasy", "", "Family"],
            "plot": "   ",
            "release_date": 2001
        }))
        .into_create()
        .unwrap();

        assert_eq!(create.title, "Spirited Away");
        assert_eq!(create.category, MediaCategory::Anime);
        assert_eq!(create.rating, Some(9));
        assert_eq!(create.genres, vec!["Fantasy", "Family"]);
        assert_eq!(create.plot, None);
        assert_eq!(create.release_year, Some(2001));
    }

    #[test]
    fn create_rejects_rating_and_stars_together() {
        let result = create_body(serde_json::json!({
            "title": "Heat", "category": "movie", "status": "planning",
            "rating": 8, "stars": 4.0
        }))
        .into_create();
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn create_rejects_out_of_range_values() {
        for body in [
            serde_json::json!({"title": "X", "category": "movie", "status": "planning", "rating": 11}),
            serde_json::json!({"title": " ", "category": "movie", "status": "planning"}),
            serde_json::json!({"title": "X", "category": "movie", "status": "planning", "release_year": 1500}),
            serde_json::json!({"title": "X", "category": "anime", "status": "watching",
                               "current_episode": {"episode": -1, "season": 1}}),
        ] {
            assert_matches!(create_body(body).into_create(), Err(CoreError::Validation(_)));
        }
    }

    #[test]
    fn unknown_category_fails_to_deserialize() {
        let result: Result<CreateMediaRequest, _> = serde_json::from_value(serde_json::json!({
            "title": "X", "category": "podcast", "status": "planning"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn update_distinguishes_absent_and_null() {
        let update = update_body(serde_json::json!({
            "status": "dropped",
            "rating": null,
            "genres": null,
            "current_episode": {"episode": 2, "season": 3}
        }))
        .into_update()
        .unwrap();

        assert_eq!(update.status, Some(MediaStatus::Dropped));
        assert_eq!(update.title, None);
        assert_eq!(update.rating, Some(None));
        assert_eq!(update.genres, Some(vec![]));
        assert_eq!(update.plot, None);
        assert_eq!(
            update.current_episode,
            Some(Some(EpisodeProgress { episode: 2, season: 3 }))
        );
    }

    #[test]
    fn update_rejects_null_required_field() {
        let result = update_body(serde_json::json!({ "title": null })).into_update();
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg == "title cannot be null");
    }

    #[test]
    fn update_converts_stars() {
        let update = update_body(serde_json::json!({ "stars": 2.5 }))
            .into_update()
            .unwrap();
        assert_eq!(update.rating, Some(Some(5)));
    }
}

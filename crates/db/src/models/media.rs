//! Media entity model and DTOs.

use mediatrack_core::media::{EpisodeProgress, MediaCategory, MediaStatus};
use mediatrack_core::rating::rating_to_stars;
use mediatrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full media row from the `media` table.
///
/// The episode / season pair is stored as two columns that are either both
/// set or both NULL (enforced by `ck_media_progress_pair`).
#[derive(Debug, Clone, FromRow)]
pub struct Media {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub status: String,
    pub rating: Option<i16>,
    pub image: Option<String>,
    pub genres: Vec<String>,
    pub plot: Option<String>,
    pub release_year: Option<i32>,
    pub current_episode: Option<i32>,
    pub current_season: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Media {
    pub fn progress(&self) -> Option<EpisodeProgress> {
        match (self.current_episode, self.current_season) {
            (Some(episode), Some(season)) => Some(EpisodeProgress { episode, season }),
            _ => None,
        }
    }
}

/// API representation of a media document.
#[derive(Debug, Clone, Serialize)]
pub struct MediaResponse {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub status: String,
    /// Canonical 0..=10 rating.
    pub rating: Option<i16>,
    /// Half-star rendering of `rating` (0.0..=5.0).
    pub stars: Option<f32>,
    pub image: Option<String>,
    pub genres: Vec<String>,
    pub plot: Option<String>,
    pub release_year: Option<i32>,
    pub current_episode: Option<EpisodeProgress>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Media> for MediaResponse {
    fn from(media: Media) -> Self {
        let current_episode = media.progress();
        Self {
            id: media.id,
            title: media.title,
            category: media.category,
            status: media.status,
            rating: media.rating,
            stars: media.rating.map(rating_to_stars),
            image: media.image,
            genres: media.genres,
            plot: media.plot,
            release_year: media.release_year,
            current_episode,
            created_at: media.created_at,
            updated_at: media.updated_at,
        }
    }
}

/// DTO for inserting a media document. Fields must already be validated.
#[derive(Debug, Clone)]
pub struct CreateMedia {
    pub title: String,
    pub category: MediaCategory,
    pub status: MediaStatus,
    pub rating: Option<i16>,
    pub image: Option<String>,
    pub genres: Vec<String>,
    pub plot: Option<String>,
    pub release_year: Option<i32>,
    pub current_episode: Option<EpisodeProgress>,
}

/// DTO for a shallow partial update.
///
/// Outer `None` keeps the stored value. For the nullable fields an inner
/// `None` clears the column. `current_episode` replaces both columns at once.
#[derive(Debug, Clone, Default)]
pub struct UpdateMedia {
    pub title: Option<String>,
    pub category: Option<MediaCategory>,
    pub status: Option<MediaStatus>,
    pub rating: Option<Option<i16>>,
    pub image: Option<Option<String>>,
    pub genres: Option<Vec<String>>,
    pub plot: Option<Option<String>>,
    pub release_year: Option<Option<i32>>,
    pub current_episode: Option<Option<EpisodeProgress>>,
}

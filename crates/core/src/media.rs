//! Media field vocabulary and validation rules.
//!
//! Category and status are closed sets; their string forms are what gets
//! stored in the `media` table and returned over the API.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum title length in characters (after trimming).
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum synopsis length in characters.
pub const MAX_PLOT_LEN: usize = 5000;

/// Maximum image reference length in characters.
pub const MAX_IMAGE_LEN: usize = 2048;

/// Maximum number of genres per media item.
pub const MAX_GENRES: usize = 20;

/// Maximum length of a single genre.
pub const MAX_GENRE_LEN: usize = 50;

/// Earliest accepted release year.
pub const MIN_RELEASE_YEAR: i32 = 1870;

/// Latest accepted release year.
pub const MAX_RELEASE_YEAR: i32 = 2100;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaCategory {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv show")]
    TvShow,
    #[serde(rename = "anime")]
    Anime,
    #[serde(rename = "documentary")]
    Documentary,
}

impl MediaCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaCategory::Movie => "movie",
            MediaCategory::TvShow => "tv show",
            MediaCategory::Anime => "anime",
            MediaCategory::Documentary => "documentary",
        }
    }

    /// Parse a catalogue filter value.
    ///
    /// Case-insensitive; also accepts the plural labels used by the catalogue
    /// page (`movies`, `tv shows`, `documentaries`) and `tv_show` / `tv-show`.
    pub fn from_filter(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "movie" | "movies" => Some(MediaCategory::Movie),
            "tv show" | "tv shows" | "tv" => Some(MediaCategory::TvShow),
            "anime" => Some(MediaCategory::Anime),
            "documentary" | "documentaries" => Some(MediaCategory::Documentary),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaStatus {
    #[serde(rename = "watching")]
    Watching,
    #[serde(rename = "on hold")]
    OnHold,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "dropped")]
    Dropped,
    #[serde(rename = "planning")]
    Planning,
}

impl MediaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaStatus::Watching => "watching",
            MediaStatus::OnHold => "on hold",
            MediaStatus::Completed => "completed",
            MediaStatus::Dropped => "dropped",
            MediaStatus::Planning => "planning",
        }
    }
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Episode progress
// ---------------------------------------------------------------------------

/// Current episode / season pair. Always written as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeProgress {
    pub episode: i32,
    pub season: i32,
}

/// Reject negative episode or season numbers.
pub fn validate_progress(progress: &EpisodeProgress) -> Result<(), CoreError> {
    if progress.episode < 0 || progress.season < 0 {
        return Err(CoreError::Validation(
            "current_episode.episode and current_episode.season must be non-negative".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Trim a title and make sure something is left.
pub fn normalize_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim genres, drop blanks, and de-duplicate case-insensitively keeping the
/// first spelling seen.
pub fn normalize_genres(genres: &[String]) -> Result<Vec<String>, CoreError> {
    let mut seen: Vec<String> = Vec::with_capacity(genres.len());
    let mut out = Vec::with_capacity(genres.len());

    for genre in genres {
        let trimmed = genre.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.chars().count() > MAX_GENRE_LEN {
            return Err(CoreError::Validation(format!(
                "genre '{trimmed}' exceeds {MAX_GENRE_LEN} characters"
            )));
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(trimmed.to_string());
    }

    if out.len() > MAX_GENRES {
        return Err(CoreError::Validation(format!(
            "at most {MAX_GENRES} genres are allowed"
        )));
    }
    Ok(out)
}

pub fn validate_release_year(year: i32) -> Result<(), CoreError> {
    if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&year) {
        return Err(CoreError::Validation(format!(
            "release_year must be between {MIN_RELEASE_YEAR} and {MAX_RELEASE_YEAR}"
        )));
    }
    Ok(())
}

pub fn validate_plot(plot: &str) -> Result<(), CoreError> {
    if plot.chars().count() > MAX_PLOT_LEN {
        return Err(CoreError::Validation(format!(
            "plot must be at most {MAX_PLOT_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_image(image: &str) -> Result<(), CoreError> {
    if image.chars().count() > MAX_IMAGE_LEN {
        return Err(CoreError::Validation(format!(
            "image must be at most {MAX_IMAGE_LEN} characters"
        )));
    }
    Ok(())
}

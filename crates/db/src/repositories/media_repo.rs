//! Repository for the `media` table and the catalogue listing.
//!
//! Media rows are only ever reached through a user's `user_media` set: a new
//! document is inserted together with its ownership row, deletes are scoped
//! to the owner, and the catalogue joins through the set.

use mediatrack_core::catalogue::CatalogueQuery;
use mediatrack_core::patch;
use mediatrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::media::{CreateMedia, Media, UpdateMedia};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, category, status, rating, image, genres, plot, \
    release_year, current_episode, current_season, created_at, updated_at";

/// Column list prefixed with the `m` alias (used in JOIN queries).
const M_COLUMNS: &str = "m.id, m.title, m.category, m.status, m.rating, m.image, m.genres, \
    m.plot, m.release_year, m.current_episode, m.current_season, m.created_at, m.updated_at";

/// Fallback order: the sequence in which media joined the user's list.
const DEFAULT_ORDER: &str = "um.added_at ASC, m.id ASC";

/// Provides CRUD operations for media documents.
pub struct MediaRepo;

impl MediaRepo {
    /// Insert a media document and append it to the user's set.
    ///
    /// Both rows are written in one transaction so a document never exists
    /// without an owner.
    pub async fn create_for_user(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateMedia,
    ) -> Result<Media, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO media \
                (title, category, status, rating, image, genres, plot, \
                 release_year, current_episode, current_season) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let media = sqlx::query_as::<_, Media>(&insert_query)
            .bind(&input.title)
            .bind(input.category.as_str())
            .bind(input.status.as_str())
            .bind(input.rating)
            .bind(&input.image)
            .bind(&input.genres)
            .bind(&input.plot)
            .bind(input.release_year)
            .bind(input.current_episode.map(|p| p.episode))
            .bind(input.current_episode.map(|p| p.season))
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO user_media (user_id, media_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(media.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(media)
    }

    /// Find a media document by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media WHERE id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a shallow partial update. Returns `None` if the row is gone.
    ///
    /// Required fields use `COALESCE`; nullable fields take a `(provided, value)`
    /// pair so an explicit `null` clears the column.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMedia,
    ) -> Result<Option<Media>, sqlx::Error> {
        let (set_rating, rating) = patch::split(&input.rating);
        let (set_image, image) = patch::split(&input.image);
        let (set_plot, plot) = patch::split(&input.plot);
        let (set_release_year, release_year) = patch::split(&input.release_year);
        let (set_progress, progress) = patch::split(&input.current_episode);

        let query = format!(
            "UPDATE media SET \
                 title           = COALESCE($2, title), \
                 category        = COALESCE($3, category), \
                 status          = COALESCE($4, status), \
                 genres          = COALESCE($5, genres), \
                 rating          = CASE WHEN $6 THEN $7 ELSE rating END, \
                 image           = CASE WHEN $8 THEN $9 ELSE image END, \
                 plot            = CASE WHEN $10 THEN $11 ELSE plot END, \
                 release_year    = CASE WHEN $12 THEN $13 ELSE release_year END, \
                 current_episode = CASE WHEN $14 THEN $15 ELSE current_episode END, \
                 current_season  = CASE WHEN $14 THEN $16 ELSE current_season END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.status.map(|s| s.as_str()))
            .bind(&input.genres)
            .bind(set_rating)
            .bind(rating.copied())
            .bind(set_image)
            .bind(image)
            .bind(set_plot)
            .bind(plot)
            .bind(set_release_year)
            .bind(release_year.copied())
            .bind(set_progress)
            .bind(progress.map(|p| p.episode))
            .bind(progress.map(|p| p.season))
            .fetch_optional(pool)
            .await
    }

    /// Delete a media document if it belongs to `user_id`.
    ///
    /// Returns `true` if a row was deleted. The ownership row goes with it
    /// through `ON DELETE CASCADE`.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM media \
             WHERE id = $1 \
               AND EXISTS (SELECT 1 FROM user_media WHERE user_id = $2 AND media_id = $1)",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the user's media, filtered and ordered per `query`.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        query: &CatalogueQuery,
    ) -> Result<Vec<Media>, sqlx::Error> {
        let order_by = query
            .order
            .map(|order| order.order_by("m"))
            .unwrap_or_else(|| DEFAULT_ORDER.to_string());

        let sql = format!(
            "SELECT {M_COLUMNS} \
             FROM user_media um \
             JOIN media m ON m.id = um.media_id \
             WHERE um.user_id = $1 \
               AND ($2::TEXT IS NULL OR m.title ILIKE $2 ESCAPE '\\') \
               AND ($3::TEXT IS NULL OR m.category = $3) \
             ORDER BY {order_by}"
        );
        sqlx::query_as::<_, Media>(&sql)
            .bind(user_id)
            .bind(&query.title_pattern)
            .bind(query.category.map(|c| c.as_str()))
            .fetch_all(pool)
            .await
    }
}

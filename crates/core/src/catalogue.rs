//! Catalogue query construction.
//!
//! Translates the optional `search`, `category` and `orderby` query parameters
//! of the catalogue endpoint into a [`CatalogueQuery`]: an ILIKE title pattern,
//! a category equality filter and a sort order drawn from a fixed table.
//! Nothing here touches the database; the repository layer renders the query.

use serde::Deserialize;

use crate::error::CoreError;
use crate::media::MediaCategory;

/// Raw query parameters as received on `GET /user/medias`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CatalogueParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub orderby: Option<String>,
}

/// Validated, normalized catalogue query.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogueQuery {
    /// Escaped `ILIKE` pattern (`%term%`) for a case-insensitive title match.
    pub title_pattern: Option<String>,
    pub category: Option<MediaCategory>,
    /// `None` keeps the order in which media joined the user's list.
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    TitleAsc,
    TitleDesc,
    CreatedAsc,
    CreatedDesc,
    UpdatedDesc,
    ReleaseAsc,
    ReleaseDesc,
    RatingLowest,
    RatingHighest,
}

impl SortOrder {
    /// Look up an `orderby` key. Accepts the canonical keys plus the labels
    /// used by the catalogue page's order-by select.
    pub fn from_key(key: &str) -> Option<Self> {
        let order = match key.trim().to_lowercase().as_str() {
            "title_asc" | "a-z" => SortOrder::TitleAsc,
            "title_desc" | "z-a" => SortOrder::TitleDesc,
            "created_asc" | "oldest" => SortOrder::CreatedAsc,
            "created_desc" | "newest" => SortOrder::CreatedDesc,
            "updated_desc" | "recently_updated" => SortOrder::UpdatedDesc,
            "release_asc" => SortOrder::ReleaseAsc,
            "release_desc" | "release_date" => SortOrder::ReleaseDesc,
            "rating_lowest" => SortOrder::RatingLowest,
            "rating_highest" | "rating" => SortOrder::RatingHighest,
            _ => return None,
        };
        Some(order)
    }

    /// Column of the `media` table this order sorts on.
    pub fn column(self) -> &'static str {
        match self {
            SortOrder::TitleAsc | SortOrder::TitleDesc => "title",
            SortOrder::CreatedAsc | SortOrder::CreatedDesc => "created_at",
            SortOrder::UpdatedDesc => "updated_at",
            SortOrder::ReleaseAsc | SortOrder::ReleaseDesc => "release_year",
            SortOrder::RatingLowest | SortOrder::RatingHighest => "rating",
        }
    }

    pub fn direction(self) -> SortDirection {
        match self {
            SortOrder::TitleAsc
            | SortOrder::CreatedAsc
            | SortOrder::ReleaseAsc
            | SortOrder::RatingLowest => SortDirection::Asc,
            SortOrder::TitleDesc
            | SortOrder::CreatedDesc
            | SortOrder::UpdatedDesc
            | SortOrder::ReleaseDesc
            | SortOrder::RatingHighest => SortDirection::Desc,
        }
    }

    /// Render an `ORDER BY` body for the given table alias.
    ///
    /// NULLs always sort last and the media id breaks ties, so the output
    /// order is total. Only static strings are interpolated.
    pub fn order_by(self, alias: &str) -> String {
        let dir = self.direction().as_sql();
        format!("{alias}.{} {dir} NULLS LAST, {alias}.id {dir}", self.column())
    }
}

impl CatalogueParams {
    /// Validate and normalize the raw parameters.
    ///
    /// Blank values are treated as absent. Unknown categories or order keys
    /// are rejected rather than silently ignored.
    pub fn build(&self) -> Result<CatalogueQuery, CoreError> {
        let title_pattern = non_blank(self.search.as_deref()).map(like_contains_pattern);

        let category = match non_blank(self.category.as_deref()) {
            None => None,
            Some(raw) => Some(MediaCategory::from_filter(raw).ok_or_else(|| {
                CoreError::Validation(format!("Unknown category '{raw}'"))
            })?),
        };

        let order = match non_blank(self.orderby.as_deref()) {
            None => None,
            Some(raw) => Some(SortOrder::from_key(raw).ok_or_else(|| {
                CoreError::Validation(format!("Unknown orderby '{raw}'"))
            })?),
        };

        Ok(CatalogueQuery {
            title_pattern,
            category,
            order,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Escape `\`, `%` and `_` and wrap the term for a substring `ILIKE` match.
///
/// The pattern must be used with `ESCAPE '\'`.
pub fn like_contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

//! Rating scale.
//!
//! Ratings are stored and accepted as integers on a 0..=10 scale. Clients that
//! render half-star widgets (0..=5 stars in steps of 0.5) convert with
//! [`rating_to_stars`] and [`stars_to_rating`]; one star is two rating points.

use crate::error::CoreError;

pub const MIN_RATING: i16 = 0;
pub const MAX_RATING: i16 = 10;

/// Number of stars shown by the half-star widget.
pub const MAX_STARS: f32 = 5.0;

pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// Convert a canonical rating into half-star units (e.g. 7 -> 3.5).
pub fn rating_to_stars(rating: i16) -> f32 {
    f32::from(rating.clamp(MIN_RATING, MAX_RATING)) / 2.0
}

/// Convert a half-star value back into a canonical rating.
///
/// Only multiples of 0.5 between 0 and 5 are accepted.
pub fn stars_to_rating(stars: f32) -> Result<i16, CoreError> {
    let doubled = stars * 2.0;
    if !stars.is_finite() || !(0.0..=MAX_STARS).contains(&stars) || doubled.fract() != 0.0 {
        return Err(CoreError::Validation(format!(
            "stars must be a multiple of 0.5 between 0 and {MAX_STARS}"
        )));
    }
    Ok(doubled as i16)
}

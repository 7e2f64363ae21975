use crate::error::CoreError;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse a raw path segment into a [`DbId`].
///
/// Anything that is not a positive integer is rejected as a validation error,
/// so a malformed identifier never reaches the database.
pub fn parse_id(raw: &str, entity: &'static str) -> Result<DbId, CoreError> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::Validation(format!("Invalid {entity} ID"))),
    }
}

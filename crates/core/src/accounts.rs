//! Account field rules.

use std::sync::LazyLock;

use crate::error::CoreError;

/// Accepted email shape: word runs joined by `.` or `-`, an `@`, a domain of
/// the same form, and at least one 2 or 3 character suffix. `\w` is ASCII only.
static EMAIL_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^(?-u:\w)+([.-]?(?-u:\w)+)*@(?-u:\w)+([.-]?(?-u:\w)+)*(\.(?-u:\w){2,3})+$",
    )
    .expect("valid regex")
});

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Active refresh-token sessions kept per user. Older ones are revoked when
/// a new session is issued.
pub const MAX_ACTIVE_SESSIONS: i64 = 10;

/// Maximum display-name length.
pub const MAX_NAME_LEN: usize = 100;

/// Emails are compared and stored trimmed and lowercased, so uniqueness does
/// not depend on the casing a user typed.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check an already normalized email against the accepted shape.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.is_empty() {
        return Err(CoreError::Validation("Email is required".into()));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(CoreError::Validation("Email is invalid".into()));
    }
    Ok(())
}

/// Trim a display name and make sure something is left.
pub fn normalize_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name is required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn common_addresses_accepted() {
        for email in ["ana@example.com", "ana.lima@mail.example.co.uk", "a-b_c@x-y.io"] {
            assert!(validate_email(email).is_ok(), "{email}");
        }
    }

    #[test]
    fn malformed_addresses_rejected() {
        for email in [
            "",
            "not-an-email",
            "ana@localhost",
            "a+b@x.museum",
            "ana@example.technology",
            "ana..lima@example.com",
            "ana@example.c",
            "ánä@example.com",
        ] {
            assert_matches!(validate_email(email), Err(CoreError::Validation(_)), "{email}");
        }
    }

    #[test]
    fn blank_name_rejected() {
        assert!(normalize_name("   ").is_err());
        assert_eq!(normalize_name(" Ana ").unwrap(), "Ana");
    }
}

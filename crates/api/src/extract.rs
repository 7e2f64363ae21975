//! Request body and path extractors.
//!
//! Rejections are turned into [`AppError`] so every malformed request gets
//! the same `{ "error", "code": "VALIDATION_ERROR" }` body as a rule violation.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use mediatrack_core::types::{parse_id, DbId};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// JSON body whose parse failures map to 400 `VALIDATION_ERROR`.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// JSON body that is also checked with its `validator` rules.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(value) = ApiJson::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| AppError::validation(describe(&errors)))?;
        Ok(Self(value))
    }
}

/// First message per failing field, sorted by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("Invalid {field}"));
            (field.to_string(), message)
        })
        .collect();
    messages.sort();
    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// `{id}` path segment of a media route, parsed as a positive integer.
#[derive(Debug, Clone, Copy)]
pub struct MediaId(pub DbId);

impl<S> FromRequestParts<S> for MediaId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("Invalid media ID"))?;
        Ok(Self(parse_id(&raw, "media")?))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(email(message = "Invalid email address"))]
        email: String,
        #[validate(length(min = 3))]
        name: String,
    }

    #[test]
    fn describe_lists_each_field_once_in_order() {
        let sample = Sample {
            email: "nope".into(),
            name: "x".into(),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(describe(&errors), "Invalid email address; Invalid name");
    }
}

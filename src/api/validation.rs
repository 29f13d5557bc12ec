use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::services::answers::OptionLetter;

/// JSON body whose rejections are reported as `400 {status, message}`.
pub(crate) struct ApiJson<T>(pub(crate) T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

pub(crate) fn validate_payload(payload: &impl Validate) -> Result<(), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Trimmed non-empty value or a 400 naming the field.
pub(crate) fn required_text(value: Option<&str>, field: &str) -> Result<String, ApiError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::BadRequest(format!("{field} is required")))
}

/// An MCQ needs two filled options and a correct letter pointing at a filled one.
pub(crate) fn validate_mcq_options(
    options: [Option<&str>; 4],
    correct_option: Option<&str>,
) -> Result<(), ApiError> {
    let is_filled = |text: Option<&str>| text.map(str::trim).is_some_and(|text| !text.is_empty());

    if options.iter().filter(|option| is_filled(**option)).count() < 2 {
        return Err(ApiError::BadRequest("MCQ requires at least two non-empty options".to_string()));
    }

    let letter = correct_option.and_then(OptionLetter::parse).ok_or_else(|| {
        ApiError::BadRequest("MCQ correct option must be one of A, B, C, D".to_string())
    })?;
    if !is_filled(options[letter.index()]) {
        return Err(ApiError::BadRequest(format!(
            "MCQ correct option {} has no text",
            letter.as_str()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank() {
        assert!(required_text(Some("  "), "subjectId").is_err());
        assert!(required_text(None, "subjectId").is_err());
        assert_eq!(required_text(Some(" s1 "), "subjectId").ok(), Some("s1".to_string()));
    }

    #[test]
    fn mcq_requires_two_options_and_valid_letter() {
        assert!(validate_mcq_options([Some("a"), Some("b"), None, None], Some("b")).is_ok());
        assert!(validate_mcq_options([Some("a"), Some(" "), None, None], Some("a")).is_err());
        assert!(validate_mcq_options([Some("a"), Some("b"), None, None], Some("E")).is_err());
        assert!(validate_mcq_options([Some("a"), Some("b"), None, None], Some("c")).is_err());
        assert!(validate_mcq_options([Some("a"), Some("b"), None, None], None).is_err());
    }
}

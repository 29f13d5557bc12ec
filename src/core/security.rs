use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::Settings;

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("jwt secret is not configured")]
    MissingSecret,
    #[error("jwt decoding failed")]
    JwtDecoding,
    #[error("unsupported jwt algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[cfg(test)]
    #[error("jwt encoding failed")]
    JwtEncoding,
}

/// Claims of an access token issued by the hosted auth service.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) aud: Option<String>,
}

pub(crate) fn verify_token(token: &str, settings: &Settings) -> Result<Claims, SecurityError> {
    let security = settings.security();
    if security.jwt_secret.is_empty() {
        return Err(SecurityError::MissingSecret);
    }

    let mut validation = Validation::new(algorithm_from_settings(settings)?);
    validation.validate_exp = true;
    validation.required_spec_claims.insert("exp".to_string());
    validation.required_spec_claims.insert("sub".to_string());
    match &security.audience {
        Some(audience) => validation.set_audience(&[audience.as_str()]),
        None => validation.validate_aud = false,
    }

    decode::<Claims>(token, &DecodingKey::from_secret(security.jwt_secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| SecurityError::JwtDecoding)
}

#[cfg(test)]
pub(crate) fn create_access_token(
    subject: &str,
    settings: &Settings,
    expires_in: time::Duration,
) -> Result<String, SecurityError> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: subject.to_string(),
        exp: (time::OffsetDateTime::now_utc() + expires_in).unix_timestamp(),
        aud: settings.security().audience.clone(),
    };

    encode(
        &Header::new(algorithm_from_settings(settings)?),
        &claims,
        &EncodingKey::from_secret(settings.security().jwt_secret.as_bytes()),
    )
    .map_err(|_| SecurityError::JwtEncoding)
}

fn algorithm_from_settings(settings: &Settings) -> Result<Algorithm, SecurityError> {
    match settings.security().algorithm.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(SecurityError::UnsupportedAlgorithm(other.to_string())),
    }
}

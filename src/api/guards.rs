use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::Profile;
use crate::db::types::UserRole;
use crate::repositories;

/// Caller authenticated by an auth-service token with a known profile.
pub(crate) struct CurrentUser(pub(crate) Profile);
pub(crate) struct CurrentAdmin(pub(crate) Profile);
/// Admin or teacher.
pub(crate) struct CurrentStaff(pub(crate) Profile);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings()).map_err(|err| {
            tracing::debug!(error = %err, "Rejected bearer token");
            ApiError::Unauthorized("Invalid authentication credentials")
        })?;

        let profile = repositories::profiles::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load profile"))?;

        let Some(profile) = profile else {
            return Err(ApiError::Unauthorized("Profile not found"));
        };

        Ok(CurrentUser(profile))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(profile) = CurrentUser::from_request_parts(parts, state).await?;

        if profile.role == UserRole::Admin {
            Ok(CurrentAdmin(profile))
        } else {
            Err(ApiError::Forbidden("Admin access required"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(profile) = CurrentUser::from_request_parts(parts, state).await?;

        match profile.role {
            UserRole::Admin | UserRole::Teacher => Ok(CurrentStaff(profile)),
            UserRole::Student => Err(ApiError::Forbidden("Teacher access required")),
        }
    }
}

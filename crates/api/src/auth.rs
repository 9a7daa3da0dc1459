use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use opto_catalog_core::auth::{verify_token, Claims};

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor gating write operations to editor roles (admin, mitarbeiter).
///
/// Missing or unverifiable tokens reject with 401; a valid customer token
/// rejects with 403. Read routes do not use this extractor at all.
pub struct RequireEditor {
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for RequireEditor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let app = AppState::from_ref(state);
        let claims = verify_token(bearer.token(), &app.config().jwt_secret)
            .map_err(|_| ApiError::Unauthorized)?;

        if !claims.role.can_write() {
            return Err(ApiError::Forbidden(
                "write access requires an editor role".to_string(),
            ));
        }
        Ok(RequireEditor { claims })
    }
}

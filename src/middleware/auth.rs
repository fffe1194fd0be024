use axum::{extract::FromRequestParts, http::header};

use crate::error::AppError;

/// Bearer token from the admin's request. It is not inspected here; the
/// backend decides what it is worth.
#[derive(Debug, Clone)]
pub struct AdminToken(pub String);

impl AdminToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AdminToken
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::BadRequest("Invalid Authorization scheme".into()));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        Ok(AdminToken(token.to_string()))
    }
}

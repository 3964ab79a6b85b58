use crate::{errors::ApiError, query::QueryState};
use axum::{extract::FromRequestParts, http::request::Parts};
use validator::Validate;

/// `?user_id=..&search=..` taken from the request URI.
///
/// Parsed leniently (a malformed `user_id` means no selection) but
/// validated: an over-long search term is rejected with 400.
#[derive(Debug, Clone)]
pub struct ViewQuery(pub QueryState);

impl<S> FromRequestParts<S> for ViewQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = QueryState::from_query(parts.uri.query().unwrap_or(""));
        query
            .validate()
            .map_err(|e| ApiError::ValidationError(e.to_string()))?;

        Ok(Self(query))
    }
}

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::db::Page;
use crate::error::PassforgeError;

/// `limit`/`offset` from the query string. A malformed value is a client error
/// carried as `PassforgeError`, so each route renders it in its own format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageQuery(pub Page);

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = PassforgeError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Query::<Page>::try_from_uri(&parts.uri)
            .map(|Query(page)| PageQuery(page))
            .map_err(|rejection| {
                PassforgeError::invalid(format!(
                    "invalid pagination parameters: {}",
                    rejection.body_text()
                ))
            })
    }
}

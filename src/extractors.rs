use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{names, rejections::AppError};

/// JSON body extractor whose failures render the 422 envelope instead of
/// axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::warn!("rejected request body: {e}");
            AppError::Unprocessable
        })?;
        Ok(JsonBody(value))
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<String>,
}

/// Extracts the 1-based `?page=` number. Missing or non-numeric values fall
/// back to the first page; zero and negative values are passed through.
pub struct Page(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for Page {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let page = Query::<PageQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.page)
            .and_then(|page| page.trim().parse::<i64>().ok())
            .unwrap_or(names::DEFAULT_PAGE);
        Ok(Page(page))
    }
}

/// Path id extractor. A segment that is not an integer does not name any
/// record, so it is reported as not found.
pub struct IdPath(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for IdPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(id) = axum::extract::Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!("unusable path id: {e}");
                AppError::NotFound
            })?;
        Ok(IdPath(id))
    }
}

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::error::CrmError;
use crate::router::CrmState;
use crate::types::pagination::{Page, PageQuery};

/// JSON body whose rejections surface as `CrmError::Validation` (400)
/// instead of axum's default 415/422 responses. Oversized bodies stay 413.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = CrmError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    CrmError::PayloadTooLarge(rejection.body_text())
                } else {
                    CrmError::Validation(rejection.body_text())
                }
            })?;
        Ok(Self(body))
    }
}

/// Integer customer id from the `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct CustomerId(pub i64);

impl<S> FromRequestParts<S> for CustomerId
where
    S: Send + Sync,
{
    type Rejection = CrmError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| CrmError::validation("customer id must be an integer"))?;
        Ok(Self(id))
    }
}

/// `?offset=&limit=` resolved against the configured page bounds.
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub Page);

impl FromRequestParts<CrmState> for Pagination {
    type Rejection = CrmError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CrmState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| CrmError::Validation(rejection.body_text()))?;
        Ok(Self(query.resolve(&state.pagination)?))
    }
}

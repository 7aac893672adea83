use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::error::ApiError;
use crate::models::Item;

/// JSON request body that parsed as an `Item` and passed validation
///
/// Any failure is reported as 422 before a handler touches the store.
pub struct ValidItem(pub Item);

impl<S> FromRequest<S> for ValidItem
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(item) = Json::<Item>::from_request(req, state).await?;
        item.validate().map_err(ApiError::InvalidItem)?;
        Ok(Self(item))
    }
}

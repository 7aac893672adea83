use crate::error::{ApiError, ErrorResponse};
use crate::items;
use crate::models::Item;
use crate::provider::TableHandle;
use crate::routes;
use axum::{extract::Path, Json};

/// GET /item/{id} handler - Retrieve an item
#[utoipa::path(
    get,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item found", body = serde_json::Value),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_handler(
    table: TableHandle,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    match items::read_item(&table, &id).await? {
        Some(item) => {
            tracing::info!("Successfully retrieved item with id: {}", id);
            Ok(Json(item))
        }
        None => Err(ApiError::ItemNotFound(id)),
    }
}

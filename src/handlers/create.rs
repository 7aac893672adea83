use crate::error::{ApiError, ErrorResponse};
use crate::extract::ValidItem;
use crate::items;
use crate::models::Item;
use crate::provider::TableHandle;
use crate::routes;
use axum::Json;

/// POST /item/ handler - Store an item
///
/// An existing item with the same id is replaced entirely.
#[utoipa::path(
    post,
    path = routes::ITEMS,
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Item stored", body = serde_json::Value),
        (status = 422, description = "Body is not a valid item", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_handler(
    table: TableHandle,
    ValidItem(item): ValidItem,
) -> Result<Json<Item>, ApiError> {
    let item = items::create_item(&table, item).await?;

    tracing::info!("Successfully stored item with id: {}", item.id);
    Ok(Json(item))
}

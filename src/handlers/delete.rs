use crate::error::{ApiError, ErrorResponse};
use crate::items;
use crate::models::MessageResponse;
use crate::provider::TableHandle;
use crate::routes;
use axum::{extract::Path, Json};

pub const DELETED_MESSAGE: &str = "Item deleted successfully";

/// DELETE /item/{id} handler - Remove an item
#[utoipa::path(
    delete,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_handler(
    table: TableHandle,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !items::delete_item(&table, &id).await? {
        return Err(ApiError::ItemNotFound(id));
    }

    tracing::info!("Successfully deleted item with id: {}", id);
    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}

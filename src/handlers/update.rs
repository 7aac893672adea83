use crate::error::{ApiError, ErrorResponse};
use crate::extract::ValidItem;
use crate::items;
use crate::models::Item;
use crate::provider::TableHandle;
use crate::routes;
use axum::{extract::Path, Json};

/// PUT /item/{id} handler - Set attributes on an existing item
///
/// Only the attributes present in the body are written; everything else on
/// the stored item is kept. The body `id` must match the path.
#[utoipa::path(
    put,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "Item id")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Item updated", body = serde_json::Value),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 422, description = "Body is not a valid item", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn update_handler(
    table: TableHandle,
    Path(id): Path<String>,
    ValidItem(item): ValidItem,
) -> Result<Json<Item>, ApiError> {
    if item.id != id {
        return Err(ApiError::InvalidItem(format!(
            "body id '{}' does not match path id '{}'",
            item.id, id
        )));
    }

    match items::update_item(&table, &id, &item.attributes).await? {
        Some(updated) => {
            tracing::info!("Successfully updated item with id: {}", id);
            Ok(Json(updated))
        }
        None => Err(ApiError::ItemNotFound(id)),
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{send, setup_test_app, setup_unavailable_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_endpoint_success() {
        let (app, _) = setup_test_app();
        send(&app, "POST", "/item/", Some(json!({"id": "1", "name": "a"}))).await;

        let (status, body) = send(&app, "PUT", "/item/1", Some(json!({"id": "1", "name": "b"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": "1", "name": "b"}));
    }

    #[tokio::test]
    async fn test_update_endpoint_keeps_unnamed_attributes() {
        let (app, _) = setup_test_app();
        send(
            &app,
            "POST",
            "/item/",
            Some(json!({"id": "1", "name": "a", "color": "red"})),
        )
        .await;

        let (status, _) = send(&app, "PUT", "/item/1", Some(json!({"id": "1", "size": 3}))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/item/1", None).await;
        assert_eq!(body["name"], "a");
        assert_eq!(body["color"], "red");
        assert_eq!(body["size"], 3);
    }

    #[tokio::test]
    async fn test_update_endpoint_not_found() {
        let (app, _) = setup_test_app();

        let (status, body) = send(&app, "PUT", "/item/1", Some(json!({"id": "1", "name": "b"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Item not found"}));

        // A missed update must not create the item
        let (status, _) = send(&app, "GET", "/item/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_endpoint_id_only() {
        let (app, _) = setup_test_app();
        send(&app, "POST", "/item/", Some(json!({"id": "1", "name": "a"}))).await;

        let (status, body) = send(&app, "PUT", "/item/1", Some(json!({"id": "1"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": "1", "name": "a"}));

        let (status, _) = send(&app, "PUT", "/item/2", Some(json!({"id": "2"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_endpoint_id_mismatch() {
        let (app, _) = setup_test_app();
        send(&app, "POST", "/item/", Some(json!({"id": "1", "name": "a"}))).await;

        let (status, body) = send(&app, "PUT", "/item/1", Some(json!({"id": "2", "name": "b"}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("does not match"));

        let (_, body) = send(&app, "GET", "/item/1", None).await;
        assert_eq!(body["name"], "a");
    }

    #[tokio::test]
    async fn test_update_endpoint_empty_attribute_name() {
        let (app, _) = setup_test_app();
        send(&app, "POST", "/item/", Some(json!({"id": "1", "name": "a"}))).await;

        let (status, _) = send(&app, "PUT", "/item/1", Some(json!({"id": "1", "meta": {"": 1}}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = send(&app, "GET", "/item/1", None).await;
        assert_eq!(body, json!({"id": "1", "name": "a"}));
    }

    #[tokio::test]
    async fn test_update_endpoint_missing_id() {
        let (app, _) = setup_test_app();

        let (status, _) = send(&app, "PUT", "/item/1", Some(json!({"name": "b"}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_update_endpoint_database_error() {
        let app = setup_unavailable_app();

        let (status, _) = send(&app, "PUT", "/item/1", Some(json!({"id": "1", "name": "b"}))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

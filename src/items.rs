//! Item operations, each addressed to the table behind a request's handle.
//!
//! Store failures are passed through untouched.

use anyhow::Result;

use crate::models::{Attributes, Item};
use crate::provider::TableHandle;

/// Write `item`, silently replacing any item with the same id.
pub async fn create_item(table: &TableHandle, item: Item) -> Result<Item> {
    table.store().put_item(table.name(), &item).await?;
    Ok(item)
}

pub async fn read_item(table: &TableHandle, id: &str) -> Result<Option<Item>> {
    table.store().get_item(table.name(), id).await
}

/// Set the named attributes on an existing item.
///
/// Attributes not mentioned are left as they are and `id` is never changed.
/// `None` means no item with this id exists, in which case nothing is written.
pub async fn update_item(table: &TableHandle, id: &str, attributes: &Attributes) -> Result<Option<Item>> {
    table.store().update_item(table.name(), id, attributes).await
}

/// Remove an item. `false` means there was nothing to remove.
pub async fn delete_item(table: &TableHandle, id: &str) -> Result<bool> {
    table.store().delete_item(table.name(), id).await
}

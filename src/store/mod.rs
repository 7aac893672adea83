//! Storage backends for items.
//!
//! `DynamoDbStore` is what the service runs against. `MemoryStore` mirrors
//! its CRUD semantics for items that pass `Item::validate`, but enforces none
//! of DynamoDB's service limits (item size, nesting depth, and so on). It
//! backs the handler tests.

mod conversions;
mod dynamodb;
mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Attributes, Item};

pub use dynamodb::DynamoDbStore;
pub use memory::MemoryStore;

/// Key-value primitives over a table of items keyed by `id`
///
/// Every call is an independent, non-transactional request. Failures are
/// returned as-is and never retried.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Write a full item, replacing any existing item with the same id.
    async fn put_item(&self, table: &str, item: &Item) -> Result<()>;

    /// Fetch an item by id, `None` when no such item exists.
    async fn get_item(&self, table: &str, id: &str) -> Result<Option<Item>>;

    /// Set the given attributes on an existing item and return the result.
    ///
    /// Returns `None` without writing anything when no item has this id.
    async fn update_item(&self, table: &str, id: &str, attributes: &Attributes) -> Result<Option<Item>>;

    /// Remove an item, returning whether one was there.
    ///
    /// Only existence is reported, so a delete never fails after the item
    /// is already gone.
    async fn delete_item(&self, table: &str, id: &str) -> Result<bool>;

    /// Verify that the table is reachable.
    async fn health_check(&self, table: &str) -> Result<()>;
}

//! In-memory store mirroring the DynamoDB store's CRUD semantics.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ItemStore;
use crate::models::{Attributes, Item, ID_ATTRIBUTE};

type Tables = HashMap<String, HashMap<String, Item>>;

/// Items held in process memory, grouped by table name
///
/// Data is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn put_item(&self, table: &str, item: &Item) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn get_item(&self, table: &str, id: &str) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|items| items.get(id)).cloned())
    }

    async fn update_item(&self, table: &str, id: &str, attributes: &Attributes) -> Result<Option<Item>> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables.get_mut(table).and_then(|items| items.get_mut(id)) else {
            return Ok(None);
        };

        for (name, value) in attributes {
            if name != ID_ATTRIBUTE {
                item.attributes.insert(name.clone(), value.clone());
            }
        }
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, table: &str, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .get_mut(table)
            .and_then(|items| items.remove(id))
            .is_some())
    }

    async fn health_check(&self, _table: &str) -> Result<()> {
        Ok(())
    }
}

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType, ReturnValue,
    ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;

use super::conversions::{attributes_to_item, item_to_attributes, json_to_attribute, key_for};
use super::ItemStore;
use crate::config::Config;
use crate::models::{Attributes, Item, ID_ATTRIBUTE};

const TABLE_ACTIVE_MAX_ATTEMPTS: u32 = 60;
const TABLE_ACTIVE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Shareable DynamoDB store for use across async handlers
///
/// The SDK client pools its connections internally, so cloning is cheap.
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Create a new store from configuration
    ///
    /// Uses the default AWS credential chain with the configured region. When
    /// `DYNAMODB_ENDPOINT_URL` is set the client talks to that endpoint instead
    /// (DynamoDB Local). With auto-provisioning enabled, the table is created
    /// here if it does not exist yet.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()));

        match &config.dynamodb_endpoint_url {
            Some(endpoint) => {
                tracing::info!("Connecting to DynamoDB at: {}", endpoint);
                loader = loader.endpoint_url(endpoint);
            }
            None => tracing::info!("Connecting to AWS DynamoDB in region {}", config.aws_region),
        }

        let sdk_config = loader.load().await;
        let store = Self::new(Client::new(&sdk_config));

        if config.auto_provision {
            store.ensure_table_exists(&config.table_name).await?;
        }

        Ok(store)
    }

    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create the items table if it is missing, then wait for it to become active
    async fn ensure_table_exists(&self, table: &str) -> Result<()> {
        match self.client.describe_table().table_name(table).send().await {
            Ok(_) => {
                tracing::info!("Table already exists: {}", table);
                return Ok(());
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                tracing::info!("Table not found, creating: {}", table);
            }
            Err(err) => return Err(err).context("Failed to check table existence"),
        }

        let created = self
            .client
            .create_table()
            .table_name(table)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(ID_ATTRIBUTE)
                    .key_type(KeyType::Hash)
                    .build()
                    .context("Failed to build key schema")?,
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(ID_ATTRIBUTE)
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .context("Failed to build attribute definition")?,
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await;

        match created {
            Ok(_) => {}
            // Someone else is creating it; wait for it like our own.
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_in_use_exception()) =>
            {
                tracing::info!("Table is already being created: {}", table);
            }
            Err(err) => return Err(err).context("Failed to create table"),
        }

        for _ in 0..TABLE_ACTIVE_MAX_ATTEMPTS {
            let output = self
                .client
                .describe_table()
                .table_name(table)
                .send()
                .await
                .context("Failed to describe table")?;

            if output.table().and_then(|t| t.table_status()) == Some(&TableStatus::Active) {
                tracing::info!("Table created successfully: {}", table);
                return Ok(());
            }
            tokio::time::sleep(TABLE_ACTIVE_POLL_INTERVAL).await;
        }

        bail!("Timed out waiting for table {} to become active", table)
    }
}

#[async_trait]
impl ItemStore for DynamoDbStore {
    async fn put_item(&self, table: &str, item: &Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item_to_attributes(item)))
            .send()
            .await
            .context("Failed to put item to DynamoDB")?;

        tracing::debug!("Put item with id: {}", item.id);
        Ok(())
    }

    async fn get_item(&self, table: &str, id: &str) -> Result<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_for(id)))
            .consistent_read(true)
            .send()
            .await
            .context("Failed to get item from DynamoDB")?;

        match output.item {
            Some(attributes) => {
                tracing::debug!("Read item with id: {}", id);
                attributes_to_item(attributes).map(Some)
            }
            None => {
                tracing::debug!("Item not found with id: {}", id);
                Ok(None)
            }
        }
    }

    async fn update_item(&self, table: &str, id: &str, attributes: &Attributes) -> Result<Option<Item>> {
        let Some(update) = UpdateExpression::build(attributes) else {
            // Nothing to set; the outcome is just whether the item exists.
            return self.get_item(table, id).await;
        };

        let result = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(key_for(id)))
            .update_expression(update.expression)
            .condition_expression(format!("attribute_exists({})", UpdateExpression::KEY_PLACEHOLDER))
            .set_expression_attribute_names(Some(update.names))
            .set_expression_attribute_values(Some(update.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => {
                tracing::debug!("Updated item with id: {}", id);
                output.attributes.map(attributes_to_item).transpose()
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                tracing::debug!("Update skipped, item not found with id: {}", id);
                Ok(None)
            }
            Err(err) => Err(err).context("Failed to update item in DynamoDB"),
        }
    }

    async fn delete_item(&self, table: &str, id: &str) -> Result<bool> {
        let output = self
            .client
            .delete_item()
            .table_name(table)
            .set_key(Some(key_for(id)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .context("Failed to delete item from DynamoDB")?;

        let existed = item_existed(output.attributes.as_ref());
        if existed {
            tracing::debug!("Deleted item with id: {}", id);
        } else {
            tracing::debug!("Nothing to delete for id: {}", id);
        }
        Ok(existed)
    }

    /// Describes the configured table; fails if it is missing or unreachable.
    async fn health_check(&self, table: &str) -> Result<()> {
        self.client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .context("Failed to describe table")?;

        tracing::debug!("Health check succeeded for table: {}", table);
        Ok(())
    }
}

/// Whether `ALL_OLD` return values show that an item was there
///
/// The old attributes are not converted; the write has already happened and
/// an attribute type we cannot represent must not turn it into a failure.
fn item_existed(old: Option<&HashMap<String, AttributeValue>>) -> bool {
    old.is_some_and(|attributes| !attributes.is_empty())
}

/// A `SET` update expression with every name and value behind a placeholder
///
/// Attribute names are arbitrary user input, so they are never spliced into
/// the expression text. This also sidesteps DynamoDB's reserved words.
#[derive(Debug, PartialEq)]
struct UpdateExpression {
    expression: String,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl UpdateExpression {
    const KEY_PLACEHOLDER: &'static str = "#pk";

    /// Returns `None` when there is nothing to set besides the key.
    fn build(attributes: &Attributes) -> Option<Self> {
        let mut clauses = Vec::new();
        let mut names = HashMap::from([(Self::KEY_PLACEHOLDER.to_string(), ID_ATTRIBUTE.to_string())]);
        let mut values = HashMap::new();

        let settable = attributes.iter().filter(|(name, _)| name.as_str() != ID_ATTRIBUTE);
        for (index, (name, value)) in settable.enumerate() {
            let name_placeholder = format!("#a{}", index);
            let value_placeholder = format!(":v{}", index);

            clauses.push(format!("{} = {}", name_placeholder, value_placeholder));
            names.insert(name_placeholder, name.clone());
            values.insert(value_placeholder, json_to_attribute(value));
        }

        if clauses.is_empty() {
            return None;
        }

        Some(Self {
            expression: format!("SET {}", clauses.join(", ")),
            names,
            values,
        })
    }
}

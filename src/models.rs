use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Name of the partition key attribute on the items table
pub const ID_ATTRIBUTE: &str = "id";

/// Free-form item attributes, in the order they were supplied
pub type Attributes = Map<String, JsonValue>;

/// A single record in the items table
///
/// Apart from `id`, an item carries any number of named attributes whose
/// values may be strings, numbers, booleans, nulls, lists or nested maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Item {
    /// Boundary check applied to every item received over HTTP
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("field `id` must not be empty".to_string());
        }
        // DynamoDB rejects empty attribute names at any depth
        if has_empty_name(&self.attributes) {
            return Err("attribute names must not be empty".to_string());
        }
        Ok(())
    }
}

fn has_empty_name(attributes: &Attributes) -> bool {
    attributes
        .iter()
        .any(|(name, value)| name.is_empty() || value_has_empty_name(value))
}

fn value_has_empty_name(value: &JsonValue) -> bool {
    match value {
        JsonValue::Object(map) => has_empty_name(map),
        JsonValue::Array(values) => values.iter().any(value_has_empty_name),
        _ => false,
    }
}

#[cfg(test)]
impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// Response type for the welcome and delete endpoints
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//! Conversions between JSON item attributes and DynamoDB `AttributeValue`s.
//!
//! Pure functions, testable without a table.

use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Number, Value as JsonValue};

use crate::models::{Attributes, Item, ID_ATTRIBUTE};

/// Convert a JSON value to its DynamoDB representation.
pub fn json_to_attribute(value: &JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null(true),
        JsonValue::Bool(b) => AttributeValue::Bool(*b),
        JsonValue::Number(n) => AttributeValue::N(n.to_string()),
        JsonValue::String(s) => AttributeValue::S(s.clone()),
        JsonValue::Array(values) => {
            AttributeValue::L(values.iter().map(json_to_attribute).collect())
        }
        JsonValue::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert a DynamoDB value back to JSON.
///
/// Map keys come back sorted since DynamoDB keeps no attribute order.
pub fn attribute_to_json(value: &AttributeValue) -> Result<JsonValue> {
    let json = match value {
        AttributeValue::Null(_) => JsonValue::Null,
        AttributeValue::Bool(b) => JsonValue::Bool(*b),
        AttributeValue::N(n) => JsonValue::Number(parse_number(n)?),
        AttributeValue::S(s) => JsonValue::String(s.clone()),
        AttributeValue::L(values) => JsonValue::Array(
            values
                .iter()
                .map(attribute_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        AttributeValue::M(map) => JsonValue::Object(map_to_attributes(map)?),
        AttributeValue::Ss(values) => {
            JsonValue::Array(values.iter().cloned().map(JsonValue::String).collect())
        }
        AttributeValue::Ns(values) => JsonValue::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(JsonValue::Number))
                .collect::<Result<Vec<_>>>()?,
        ),
        other => bail!("Unsupported DynamoDB attribute type: {:?}", other),
    };
    Ok(json)
}

/// Convert an item into a full DynamoDB item, key included.
pub fn item_to_attributes(item: &Item) -> HashMap<String, AttributeValue> {
    let mut attributes: HashMap<String, AttributeValue> = item
        .attributes
        .iter()
        .map(|(name, value)| (name.clone(), json_to_attribute(value)))
        .collect();
    attributes.insert(ID_ATTRIBUTE.to_string(), AttributeValue::S(item.id.clone()));
    attributes
}

/// Convert a DynamoDB item into an `Item`.
pub fn attributes_to_item(mut attributes: HashMap<String, AttributeValue>) -> Result<Item> {
    let id = match attributes.remove(ID_ATTRIBUTE) {
        Some(AttributeValue::S(id)) => id,
        Some(other) => bail!("Item key `{}` is not a string: {:?}", ID_ATTRIBUTE, other),
        None => bail!("Item is missing its `{}` key", ID_ATTRIBUTE),
    };

    let attributes = map_to_attributes(&attributes)
        .with_context(|| format!("Failed to convert attributes of item {}", id))?;

    Ok(Item { id, attributes })
}

/// Key map addressing a single item by id.
pub fn key_for(id: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([(ID_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string()))])
}

fn map_to_attributes(map: &HashMap<String, AttributeValue>) -> Result<Attributes> {
    let mut names: Vec<&String> = map.keys().collect();
    names.sort();

    let mut attributes = Attributes::new();
    for name in names {
        let value = attribute_to_json(&map[name])
            .with_context(|| format!("Failed to convert attribute `{}`", name))?;
        attributes.insert(name.clone(), value);
    }
    Ok(attributes)
}

fn parse_number(raw: &str) -> Result<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    let f = raw
        .parse::<f64>()
        .with_context(|| format!("Invalid DynamoDB number: {}", raw))?;
    Number::from_f64(f).ok_or_else(|| anyhow!("Non-finite DynamoDB number: {}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(json_to_attribute(&json!(null)), AttributeValue::Null(true));
        assert_eq!(json_to_attribute(&json!(true)), AttributeValue::Bool(true));
        assert_eq!(json_to_attribute(&json!(42)), AttributeValue::N("42".to_string()));
        assert_eq!(json_to_attribute(&json!(-1.5)), AttributeValue::N("-1.5".to_string()));
        assert_eq!(json_to_attribute(&json!("x")), AttributeValue::S("x".to_string()));
    }

    #[test]
    fn test_nested_values_survive_conversion() {
        let value = json!({
            "array": [1, "two", null],
            "nested": {"key": "value", "flag": false},
            "big": 18446744073709551615u64,
            "float": 2.25
        });

        let back = attribute_to_json(&json_to_attribute(&value)).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_string_and_number_sets_become_arrays() {
        let ss = AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(attribute_to_json(&ss).unwrap(), json!(["a", "b"]));

        let ns = AttributeValue::Ns(vec!["1".to_string(), "2.5".to_string()]);
        assert_eq!(attribute_to_json(&ns).unwrap(), json!([1, 2.5]));
    }

    #[test]
    fn test_binary_is_unsupported() {
        let b = AttributeValue::B(aws_sdk_dynamodb::primitives::Blob::new(vec![1, 2]));
        assert!(attribute_to_json(&b).is_err());
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        assert!(attribute_to_json(&AttributeValue::N("abc".to_string())).is_err());
    }

    #[test]
    fn test_item_to_attributes_includes_key() {
        let item = Item::new("1").with_attribute("name", json!("a"));
        let attributes = item_to_attributes(&item);

        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes["id"], AttributeValue::S("1".to_string()));
        assert_eq!(attributes["name"], AttributeValue::S("a".to_string()));
    }

    #[test]
    fn test_attributes_to_item() {
        let attributes = HashMap::from([
            ("id".to_string(), AttributeValue::S("1".to_string())),
            ("name".to_string(), AttributeValue::S("a".to_string())),
            ("count".to_string(), AttributeValue::N("3".to_string())),
        ]);

        let item = attributes_to_item(attributes).unwrap();
        assert_eq!(item.id, "1");
        let names: Vec<&str> = item.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["count", "name"]);
        assert_eq!(item.attributes["count"], json!(3));
    }

    #[test]
    fn test_attributes_to_item_requires_string_id() {
        let missing = HashMap::from([("name".to_string(), AttributeValue::S("a".to_string()))]);
        assert!(attributes_to_item(missing).is_err());

        let numeric = HashMap::from([("id".to_string(), AttributeValue::N("1".to_string()))]);
        assert!(attributes_to_item(numeric).is_err());
    }
}

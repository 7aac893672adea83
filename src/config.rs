use std::env;
use std::str::FromStr;
use anyhow::{bail, Context, Result};

pub const DEFAULT_AWS_REGION: &str = "us-east-1";
pub const DEFAULT_TABLE_NAME: &str = "fastapi-dynamodb-table";

/// Where items are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    /// Process memory, for local runs without AWS access
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown store backend '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub aws_region: String,
    pub table_name: String,
    pub dynamodb_endpoint_url: Option<String>,
    pub auto_provision: bool,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Region and table name are taken as-is; a bad value only shows up
    /// once DynamoDB rejects a request.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = lookup("ITEM_STORE")
            .unwrap_or_else(|| "dynamodb".to_string())
            .parse::<StoreBackend>()
            .context("ITEM_STORE must be 'dynamodb' or 'memory'")?;

        let aws_region = lookup("AWS_REGION")
            .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string());

        let table_name = lookup("DYNAMODB_TABLE_NAME")
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());

        let dynamodb_endpoint_url = lookup("DYNAMODB_ENDPOINT_URL");

        let auto_provision = lookup("DYNAMODB_AUTO_PROVISION")
            .unwrap_or_else(|| "false".to_string())
            .parse::<bool>()
            .context("DYNAMODB_AUTO_PROVISION must be 'true' or 'false'")?;

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            store_backend,
            aws_region,
            table_name,
            dynamodb_endpoint_url,
            auto_provision,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {:?}", self.store_backend);
        tracing::info!("  AWS region: {}", self.aws_region);
        tracing::info!("  DynamoDB table: {}", self.table_name);
        tracing::info!("  DynamoDB endpoint: {}",
            self.dynamodb_endpoint_url.as_deref().unwrap_or("default (using AWS)"));
        tracing::info!("  Auto-provisioning: {}", self.auto_provision);
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_with_all_vars() {
        let config = load(&[
            ("ITEM_STORE", "memory"),
            ("AWS_REGION", "eu-west-1"),
            ("DYNAMODB_TABLE_NAME", "items"),
            ("DYNAMODB_ENDPOINT_URL", "http://localhost:8001"),
            ("DYNAMODB_AUTO_PROVISION", "true"),
            ("SERVICE_PORT", "8080"),
            ("SERVICE_HOST", "127.0.0.1"),
        ])
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.table_name, "items");
        assert_eq!(config.dynamodb_endpoint_url, Some("http://localhost:8001".to_string()));
        assert!(config.auto_provision);
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
    }

    #[test]
    fn test_config_with_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.store_backend, StoreBackend::DynamoDb);
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.table_name, "fastapi-dynamodb-table");
        assert_eq!(config.dynamodb_endpoint_url, None);
        assert!(!config.auto_provision);
        assert_eq!(config.service_port, 8000);
        assert_eq!(config.service_host, "0.0.0.0");
    }

    #[test]
    fn test_table_name_is_not_validated() {
        let config = load(&[("DYNAMODB_TABLE_NAME", "not a valid table!")]).unwrap();
        assert_eq!(config.table_name, "not a valid table!");
    }

    #[test]
    fn test_invalid_port() {
        let result = load(&[("SERVICE_PORT", "not-a-number")]);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        let result = load(&[("SERVICE_PORT", "99999")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_store_backend() {
        let result = load(&[("ITEM_STORE", "sqlite")]);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("ITEM_STORE"));
    }

    #[test]
    fn test_invalid_auto_provision() {
        let result = load(&[("DYNAMODB_AUTO_PROVISION", "yes")]);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("DYNAMODB_AUTO_PROVISION"));
    }
}

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub catalog_source: CatalogSourceKind,
    pub products_csv_path: Option<String>,
    pub customers_csv_path: Option<String>,
    pub sheet_gateway_url: Option<String>,
    pub catalog_cache_ttl_secs: u64,
    /// Fee labels that are only applied when a request opts in.
    pub optional_fee_labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSourceKind {
    Csv,
    Sheet,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let catalog_source = match env_map
            .get("CATALOG_SOURCE")
            .map(|s| s.as_str())
            .unwrap_or("csv")
        {
            "csv" => CatalogSourceKind::Csv,
            "sheet" => CatalogSourceKind::Sheet,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CATALOG_SOURCE".to_string(),
                    format!("must be csv or sheet, got {}", other),
                ))
            }
        };

        let products_csv_path = env_map.get("PRODUCTS_CSV_PATH").cloned();
        let customers_csv_path = env_map.get("CUSTOMERS_CSV_PATH").cloned();
        let sheet_gateway_url = env_map.get("SHEET_GATEWAY_URL").cloned();

        match catalog_source {
            CatalogSourceKind::Csv => {
                if products_csv_path.is_none() {
                    return Err(ConfigError::MissingEnv("PRODUCTS_CSV_PATH".to_string()));
                }
                if customers_csv_path.is_none() {
                    return Err(ConfigError::MissingEnv("CUSTOMERS_CSV_PATH".to_string()));
                }
            }
            CatalogSourceKind::Sheet => {
                if sheet_gateway_url.is_none() {
                    return Err(ConfigError::MissingEnv("SHEET_GATEWAY_URL".to_string()));
                }
            }
        }

        let catalog_cache_ttl_secs = env_map
            .get("CATALOG_CACHE_TTL_SECS")
            .map(|s| s.as_str())
            .unwrap_or("300")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "CATALOG_CACHE_TTL_SECS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        let optional_fee_labels = env_map
            .get("OPTIONAL_FEE_LABELS")
            .map(|s| s.as_str())
            .unwrap_or("regional_trunk_fee")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            port,
            database_path,
            catalog_source,
            products_csv_path,
            customers_csv_path,
            sheet_gateway_url,
            catalog_cache_ttl_secs,
            optional_fee_labels,
        })
    }
}

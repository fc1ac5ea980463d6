//! Seed configuration loading from config.toml
//!
//! The default categories and the sample items written on first run are defined in a
//! TOML file, together with the stock policy settings.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default upper bound for a quantity typed into a quick inbound/outbound prompt.
pub const DEFAULT_MAX_QUICK_QUANTITY: u32 = 9999;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Default categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Sample items to seed when no items are stored yet
    #[serde(default)]
    pub sample_items: Vec<SampleItemConfig>,
    /// Stock policy
    #[serde(default)]
    pub stock: StockConfig,
}

/// A default category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,
    /// Icon glyph
    #[serde(default)]
    pub icon: String,
    /// Description
    #[serde(default)]
    pub description: String,
}

/// A sample item with its starting quantity
#[derive(Debug, Deserialize, Clone)]
pub struct SampleItemConfig {
    /// Item identifier, e.g. "001"
    pub id: String,
    /// Item name
    pub name: String,
    /// Name of one of the seeded categories; unknown names fall back to "Other"
    pub category: String,
    /// Unit label
    pub unit: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Starting quantity
    #[serde(default)]
    pub quantity: u32,
}

/// Stock policy settings
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct StockConfig {
    /// Largest quantity accepted from a quick prompt
    #[serde(default = "default_max_quick_quantity")]
    pub max_quick_quantity: u32,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            max_quick_quantity: DEFAULT_MAX_QUICK_QUANTITY,
        }
    }
}

const fn default_max_quick_quantity() -> u32 {
    DEFAULT_MAX_QUICK_QUANTITY
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses seed configuration from TOML text
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.stock.max_quick_quantity == 0 {
        return Err(Error::Config {
            message: "stock.max_quick_quantity must be greater than zero".to_string(),
        });
    }
    Ok(config)
}

/// Loads the configuration from `STOCK_CONFIG_PATH`, or ./config.toml when unset
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("STOCK_CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

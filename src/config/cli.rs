use crate::config::toml_config::TomlConfig;
use crate::domain::model::ProductId;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cart-store")]
#[command(about = "Manage a storefront shopping cart against the stock service")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Base URL of the product/stock API")]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Directory holding the persisted cart")]
    pub storage_path: Option<String>,

    #[arg(long, help = "Storage key for the persisted cart")]
    pub cart_key: Option<String>,

    #[arg(long, help = "Per-query timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CartCommand {
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set a product's quantity
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Raise a product's quantity by one
    Increment { product_id: ProductId },
    /// Lower a product's quantity by one
    Decrement { product_id: ProductId },
    /// Show the cart
    List,
}

impl CliConfig {
    /// File settings (or defaults) with command-line flags layered on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(base_url) = &self.api_base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(path) = &self.storage_path {
            config.storage.path = path.clone();
        }
        if let Some(key) = &self.cart_key {
            config.storage.cart_key = key.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.api.timeout_seconds = timeout;
        }

        Ok(config)
    }
}

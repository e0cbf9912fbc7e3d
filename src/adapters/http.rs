use crate::core::{CatalogOracle, ConfigProvider, StockOracle};
use crate::domain::model::{ProductId, ProductRecord, StockRecord};
use crate::utils::error::{CartError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct StockPayload {
    amount: i64,
}

/// Stock and catalog lookups against the storefront API:
/// `GET {base}/stock/{id}` and `GET {base}/products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpStoreApi {
    client: Client,
    base_url: String,
}

impl HttpStoreApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        product_id: ProductId,
        resource: &str,
    ) -> Result<T> {
        let url = format!("{}/{}/{}", self.base_url, resource, product_id);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(CartError::OracleQueryFailed {
                product_id,
                reason: format!("no {} record", resource),
            });
        }
        if !status.is_success() {
            return Err(CartError::OracleQueryFailed {
                product_id,
                reason: format!("{} query returned status {}", resource, status),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl StockOracle for HttpStoreApi {
    async fn get_stock(&self, product_id: ProductId) -> Result<StockRecord> {
        let payload: StockPayload = self.fetch(product_id, "stock").await?;
        Ok(StockRecord {
            product_id,
            available_quantity: payload.amount,
        })
    }
}

#[async_trait]
impl CatalogOracle for HttpStoreApi {
    async fn get_product(&self, product_id: ProductId) -> Result<ProductRecord> {
        self.fetch(product_id, "products").await
    }
}

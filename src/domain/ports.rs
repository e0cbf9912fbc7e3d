use crate::domain::model::{ProductId, ProductRecord, StockRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read-only availability lookup.
#[async_trait]
pub trait StockOracle: Send + Sync {
    async fn get_stock(&self, product_id: ProductId) -> Result<StockRecord>;
}

/// Read-only product metadata lookup.
#[async_trait]
pub trait CatalogOracle: Send + Sync {
    async fn get_product(&self, product_id: ProductId) -> Result<ProductRecord>;
}

/// Durable key-value storage. `read` yields `None` when the key was never written.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write(&self, key: &str, data: &[u8]) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// One-way sink for shopper-facing failure messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn cart_key(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}

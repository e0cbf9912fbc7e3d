// Application wiring: builds a cart store from configuration.

use crate::adapters::http::HttpStoreApi;
use crate::adapters::storage::LocalStorage;
use crate::core::cart_store::CartStore;
use crate::core::persistence::CartPersistence;
use crate::core::{ConfigProvider, Notifier};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Cart persisted on the local filesystem, with both oracles served by the storefront API.
pub async fn open_local_store<C: ConfigProvider>(
    config: &C,
    notifier: Arc<dyn Notifier>,
) -> Result<CartStore<LocalStorage>> {
    let api = Arc::new(HttpStoreApi::from_config(config)?);
    let persistence = CartPersistence::with_key(
        LocalStorage::new(config.storage_path()),
        config.cart_key(),
    );

    tracing::debug!(
        "Opening cart '{}' in {} against {}",
        config.cart_key(),
        config.storage_path(),
        api.base_url()
    );

    let store = CartStore::open(persistence, api.clone(), api, notifier).await?;
    Ok(store.with_query_timeout(Duration::from_secs(config.timeout_seconds())))
}

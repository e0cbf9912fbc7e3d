use crate::core::Storage;
use crate::domain::model::CartLineItem;
use crate::utils::error::Result;

pub const DEFAULT_CART_KEY: &str = "cart.json";

/// Mirrors the whole cart under a single storage key.
pub struct CartPersistence<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> CartPersistence<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_CART_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Missing key means an empty cart.
    pub async fn load(&self) -> Result<Vec<CartLineItem>> {
        match self.storage.read(&self.key).await? {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrites the stored cart wholesale.
    pub async fn save(&self, items: &[CartLineItem]) -> Result<()> {
        let data = serde_json::to_vec(items)?;
        tracing::debug!("Writing {} line-items ({} bytes) to '{}'", items.len(), data.len(), self.key);
        self.storage.write(&self.key, &data).await
    }
}

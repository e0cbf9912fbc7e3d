use crate::core::persistence::CartPersistence;
use crate::core::single_flight::KeyedLocks;
use crate::core::{CatalogOracle, Notifier, StockOracle, Storage};
use crate::domain::model::{
    CartLineItem, CartOutcome, ProductId, ProductRecord, StockRecord, UpdateProductAmount,
};
use crate::utils::error::{CartError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns the in-memory cart and keeps the persistence sink in step with it.
///
/// Every mutation goes through a stock check and holds a per-product lock for
/// its whole duration, so overlapping calls for the same product apply in
/// order. A failed operation leaves the cart and the sink untouched, returns
/// the error and sends exactly one message to the notifier.
pub struct CartStore<S: Storage> {
    items: Mutex<Vec<CartLineItem>>,
    persistence: CartPersistence<S>,
    stock: Arc<dyn StockOracle>,
    catalog: Arc<dyn CatalogOracle>,
    notifier: Arc<dyn Notifier>,
    locks: KeyedLocks,
    query_timeout: Duration,
}

impl<S: Storage> CartStore<S> {
    /// Loads the stored cart once. An unreadable payload starts an empty cart
    /// that replaces it on the next successful mutation.
    pub async fn open(
        persistence: CartPersistence<S>,
        stock: Arc<dyn StockOracle>,
        catalog: Arc<dyn CatalogOracle>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let items = match persistence.load().await {
            Ok(items) => items,
            Err(CartError::Serialization(e)) => {
                tracing::warn!(
                    "Stored cart under '{}' is unreadable, starting empty: {}",
                    persistence.key(),
                    e
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Cart loaded with {} line-items", items.len());

        Ok(Self {
            items: Mutex::new(items),
            persistence,
            stock,
            catalog,
            notifier,
            locks: KeyedLocks::new(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        })
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Ordered snapshot of the line-items.
    pub async fn cart(&self) -> Vec<CartLineItem> {
        self.items.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    pub async fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.items
            .lock()
            .await
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
    }

    pub async fn total(&self) -> f64 {
        self.items.lock().await.iter().map(CartLineItem::subtotal).sum()
    }

    /// Adds one unit: creates the line-item with quantity 1, or increments it.
    pub async fn add_product(&self, product_id: ProductId) -> Result<CartOutcome> {
        tracing::debug!("add_product({})", product_id);
        let result = self.try_add_product(product_id).await;
        self.report(result)
    }

    pub async fn remove_product(&self, product_id: ProductId) -> Result<CartOutcome> {
        tracing::debug!("remove_product({})", product_id);
        let result = self.try_remove_product(product_id).await;
        self.report(result)
    }

    /// Sets the quantity to exactly `amount`. Amounts ≤ 0 and products not in
    /// the cart are ignored.
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Result<CartOutcome> {
        tracing::debug!(
            "update_product_amount({}, {})",
            request.product_id,
            request.amount
        );
        let result = self.try_update_product_amount(request).await;
        self.report(result)
    }

    /// Current quantity + 1, as the cart page's plus button does.
    pub async fn increment_product(&self, product_id: ProductId) -> Result<CartOutcome> {
        tracing::debug!("increment_product({})", product_id);
        let result = self.try_step_product(product_id, 1).await;
        self.report(result)
    }

    /// Current quantity - 1. Going below one is a no-op; use `remove_product`.
    pub async fn decrement_product(&self, product_id: ProductId) -> Result<CartOutcome> {
        tracing::debug!("decrement_product({})", product_id);
        let result = self.try_step_product(product_id, -1).await;
        self.report(result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<CartOutcome> {
        let _guard = self.locks.acquire(product_id).await;

        let stock = self.query_stock(product_id).await?;
        let available = stock.available_quantity;

        match self.quantity_of(product_id).await {
            None => {
                if available <= 0 {
                    return Err(CartError::StockExceeded {
                        product_id,
                        requested: 1,
                        available,
                    });
                }

                let product = self.query_product(product_id).await?;
                let item = CartLineItem::from_product(
                    ProductRecord {
                        product_id,
                        ..product
                    },
                    1,
                );

                let mut items = self.items.lock().await;
                items.push(item);
                self.persist(&items).await;
                tracing::info!("Added product {} to cart", product_id);
            }
            Some(quantity) => {
                let requested = i64::from(quantity) + 1;
                let next = quantity
                    .checked_add(1)
                    .filter(|_| available >= requested)
                    .ok_or(CartError::StockExceeded {
                        product_id,
                        requested,
                        available,
                    })?;

                let mut items = self.items.lock().await;
                if let Some(item) = items.iter_mut().find(|item| item.product_id == product_id) {
                    item.quantity = next;
                }
                self.persist(&items).await;
                tracing::info!("Product {} quantity now {}", product_id, next);
            }
        }

        Ok(CartOutcome::Updated)
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<CartOutcome> {
        let _guard = self.locks.acquire(product_id).await;

        let mut items = self.items.lock().await;
        let position = items
            .iter()
            .position(|item| item.product_id == product_id)
            .ok_or(CartError::ProductNotFound { product_id })?;

        items.remove(position);
        self.persist(&items).await;
        tracing::info!("Removed product {} from cart", product_id);

        Ok(CartOutcome::Updated)
    }

    async fn try_update_product_amount(&self, request: UpdateProductAmount) -> Result<CartOutcome> {
        if request.amount <= 0 {
            return Ok(CartOutcome::Unchanged);
        }

        let _guard = self.locks.acquire(request.product_id).await;
        self.try_update_locked(request).await
    }

    /// Reads and rewrites the quantity under one lock so overlapping steps both land.
    async fn try_step_product(&self, product_id: ProductId, delta: i64) -> Result<CartOutcome> {
        let _guard = self.locks.acquire(product_id).await;

        let Some(quantity) = self.quantity_of(product_id).await else {
            return Ok(CartOutcome::Unchanged);
        };

        self.try_update_locked(UpdateProductAmount {
            product_id,
            amount: i64::from(quantity) + delta,
        })
        .await
    }

    /// Caller holds the product lock.
    async fn try_update_locked(&self, request: UpdateProductAmount) -> Result<CartOutcome> {
        let UpdateProductAmount { product_id, amount } = request;
        if amount <= 0 {
            return Ok(CartOutcome::Unchanged);
        }

        let stock = self
            .query_stock(product_id)
            .await
            .map_err(|e| CartError::AmountUpdateFailed {
                product_id,
                reason: e.to_string(),
            })?;

        let available = stock.available_quantity;
        if available < amount {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount,
                available,
            });
        }

        let quantity = u32::try_from(amount).map_err(|_| CartError::AmountUpdateFailed {
            product_id,
            reason: format!("amount {} is out of range", amount),
        })?;

        let mut items = self.items.lock().await;
        let Some(item) = items.iter_mut().find(|item| item.product_id == product_id) else {
            tracing::debug!("Product {} not in cart, ignoring amount update", product_id);
            return Ok(CartOutcome::Unchanged);
        };

        item.quantity = quantity;
        self.persist(&items).await;
        tracing::info!("Product {} quantity set to {}", product_id, quantity);

        Ok(CartOutcome::Updated)
    }

    async fn query_stock(&self, product_id: ProductId) -> Result<StockRecord> {
        match tokio::time::timeout(self.query_timeout, self.stock.get_stock(product_id)).await {
            Ok(result) => result.map_err(|e| query_failure(product_id, e)),
            Err(_) => Err(CartError::OracleQueryFailed {
                product_id,
                reason: format!("stock query timed out after {:?}", self.query_timeout),
            }),
        }
    }

    async fn query_product(&self, product_id: ProductId) -> Result<ProductRecord> {
        match tokio::time::timeout(self.query_timeout, self.catalog.get_product(product_id)).await
        {
            Ok(result) => result.map_err(|e| query_failure(product_id, e)),
            Err(_) => Err(CartError::OracleQueryFailed {
                product_id,
                reason: format!("catalog query timed out after {:?}", self.query_timeout),
            }),
        }
    }

    /// Durability is best effort: the in-memory cart stays authoritative.
    async fn persist(&self, items: &[CartLineItem]) {
        if let Err(e) = self.persistence.save(items).await {
            tracing::error!(
                "Failed to persist cart under '{}': {}",
                self.persistence.key(),
                e
            );
        }
    }

    fn report(&self, result: Result<CartOutcome>) -> Result<CartOutcome> {
        if let Err(e) = &result {
            tracing::warn!("Cart operation failed: {}", e);
            self.notifier.notify(&e.user_message());
        }
        result
    }
}

fn query_failure(product_id: ProductId, error: CartError) -> CartError {
    match error {
        CartError::OracleQueryFailed { .. } => error,
        other => CartError::OracleQueryFailed {
            product_id,
            reason: other.to_string(),
        },
    }
}

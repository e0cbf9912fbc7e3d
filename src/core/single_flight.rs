use crate::domain::model::ProductId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-product async locks: callers holding the same id run one at a time.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<ProductId, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, product_id: ProductId) -> KeyGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(product_id).or_default().clone()
        };

        let guard = lock.lock_owned().await;
        KeyGuard {
            owner: self,
            product_id,
            guard: Some(guard),
        }
    }

    /// Number of ids with a live lock entry.
    pub fn active(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub struct KeyGuard<'a> {
    owner: &'a KeyedLocks,
    product_id: ProductId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();

        // only the map itself still references the lock: nobody holds or waits on it
        let mut locks = self.owner.locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = locks.get(&self.product_id) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(&self.product_id);
            }
        }
    }
}

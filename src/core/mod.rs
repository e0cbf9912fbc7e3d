pub mod cart_store;
pub mod persistence;
pub mod single_flight;

pub use crate::domain::model::{CartLineItem, CartOutcome, ProductId, UpdateProductAmount};
pub use crate::domain::ports::{CatalogOracle, ConfigProvider, Notifier, StockOracle, Storage};
pub use crate::utils::error::Result;

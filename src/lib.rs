pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CartCommand, CliConfig};

pub use adapters::http::HttpStoreApi;
pub use adapters::notifier::{RecordingNotifier, SilentNotifier, TracingNotifier};
pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use config::TomlConfig;
pub use core::cart_store::CartStore;
pub use core::persistence::CartPersistence;
pub use domain::model::{CartLineItem, CartOutcome, ProductId, UpdateProductAmount};
pub use utils::error::{CartError, Result};

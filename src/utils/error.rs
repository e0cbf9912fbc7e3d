use crate::domain::model::ProductId;
use thiserror::Error;

pub const MSG_STOCK_EXCEEDED: &str = "requested quantity exceeds available stock";
pub const MSG_REMOVE_FAILED: &str = "error removing product";
pub const MSG_ADD_FAILED: &str = "error adding product";
pub const MSG_UPDATE_FAILED: &str = "error changing product quantity";

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Requested quantity {requested} of product {product_id} exceeds available stock {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    #[error("Product {product_id} is not in the cart")]
    ProductNotFound { product_id: ProductId },

    #[error("Query for product {product_id} failed: {reason}")]
    OracleQueryFailed { product_id: ProductId, reason: String },

    #[error("Amount update for product {product_id} failed: {reason}")]
    AmountUpdateFailed { product_id: ProductId, reason: String },

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl CartError {
    /// Text shown to the shopper when a cart operation fails.
    pub fn user_message(&self) -> String {
        match self {
            CartError::StockExceeded { .. } => MSG_STOCK_EXCEEDED.to_string(),
            CartError::ProductNotFound { .. } => MSG_REMOVE_FAILED.to_string(),
            CartError::OracleQueryFailed { .. } => MSG_ADD_FAILED.to_string(),
            CartError::AmountUpdateFailed { .. } => MSG_UPDATE_FAILED.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the shopper can fix this by choosing a different quantity or product.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            CartError::StockExceeded { .. } | CartError::ProductNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = CartError::StockExceeded {
            product_id: 1,
            requested: 3,
            available: 2,
        };
        assert_eq!(err.user_message(), MSG_STOCK_EXCEEDED);
        assert!(err.is_user_recoverable());

        let err = CartError::ProductNotFound { product_id: 9 };
        assert_eq!(err.user_message(), MSG_REMOVE_FAILED);

        let err = CartError::AmountUpdateFailed {
            product_id: 9,
            reason: "timeout".to_string(),
        };
        assert_eq!(err.user_message(), MSG_UPDATE_FAILED);
        assert!(!err.is_user_recoverable());
    }

    #[test]
    fn test_display_includes_details() {
        let err = CartError::OracleQueryFailed {
            product_id: 42,
            reason: "status 404".to_string(),
        };
        assert_eq!(err.to_string(), "Query for product 42 failed: status 404");
    }
}

//! Storefront error types.

use common::Localized;
use domain::ValidationErrors;
use thiserror::Error;

/// Errors raised by a [`KeyValueStorage`](crate::KeyValueStorage) backend.
///
/// The cart and language preference never surface these; they log and fall
/// back to defaults.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend refused the operation (quota, private mode, disabled).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a checkout did not produce a quotation.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to submit; the customer belongs back on the cart page.
    #[error("Cart is empty")]
    EmptyCart,

    /// The server refused the submission on field validation.
    #[error("Submission rejected: {0}")]
    Rejected(ValidationErrors),

    /// Transport or server failure. The cart is left intact for a retry.
    #[error("Quotation gateway failed: {0}")]
    Gateway(String),
}

impl CheckoutError {
    /// The message shown to the customer.
    pub fn message(&self) -> Localized {
        match self {
            CheckoutError::EmptyCart => Localized::new("Your cart is empty", "आपका कार्ट खाली है"),
            CheckoutError::Rejected(_) => Localized::new(
                "Please correct the highlighted fields",
                "कृपया चिह्नित फ़ील्ड सुधारें",
            ),
            CheckoutError::Gateway(_) => Localized::new(
                "Failed to submit quotation. Please try again.",
                "कोटेशन सबमिट करने में विफल। कृपया पुन: प्रयास करें।",
            ),
        }
    }
}

/// Convenience type alias for storage results.
pub type Result<T> = std::result::Result<T, StorageError>;

//! Customer-side storefront state.
//!
//! The cart and language preference live in device-local storage behind the
//! [`KeyValueStorage`] port. [`Checkout`] validates the cart and contact
//! form and hands the result to a [`QuotationGateway`].

pub mod cart;
pub mod checkout;
pub mod context;
pub mod error;
pub mod language;
pub mod storage;

pub use cart::{CART_KEY, CartChange, CartChanged, CartItem, CartStore};
pub use checkout::{Checkout, CheckoutForm, CheckoutOutcome, InProcessGateway, QuotationGateway};
pub use context::StorefrontContext;
pub use error::{CheckoutError, StorageError};
pub use language::{LANGUAGE_KEY, LanguagePreference, Text};
pub use storage::{FailingStorage, InMemoryStorage, JsonFileStorage, KeyValueStorage};

use std::sync::Arc;

use common::Language;

use crate::cart::CartStore;
use crate::language::LanguagePreference;
use crate::storage::KeyValueStorage;

/// Per-device storefront state: the cart and the display language, both
/// backed by the same storage.
pub struct StorefrontContext {
    cart: CartStore,
    language: LanguagePreference,
}

impl StorefrontContext {
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            cart: CartStore::new(storage.clone()),
            language: LanguagePreference::load(storage).await,
        }
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn language(&self) -> &LanguagePreference {
        &self.language
    }

    pub async fn set_language(&mut self, language: Language) {
        self.language.set(language).await;
    }
}

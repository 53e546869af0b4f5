//! Display-language preference and the storefront's fixed UI strings.

use std::sync::Arc;

use common::{Language, Localized};

use crate::storage::KeyValueStorage;

/// Storage key the preference is kept under.
pub const LANGUAGE_KEY: &str = "language";

/// The customer's chosen display language, persisted on the device.
///
/// Anything other than a stored `en`/`hi` (including a storage failure)
/// loads as English.
pub struct LanguagePreference {
    storage: Arc<dyn KeyValueStorage>,
    language: Language,
}

impl LanguagePreference {
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let language = match storage.get(LANGUAGE_KEY).await {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_default(),
            Ok(None) => Language::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read language preference");
                Language::default()
            }
        };
        Self { storage, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switches language. The in-memory choice always changes; a failed
    /// write only means it will not survive a reload.
    pub async fn set(&mut self, language: Language) {
        self.language = language;
        if let Err(e) = self.storage.set(LANGUAGE_KEY, language.code().to_string()).await {
            tracing::warn!(error = %e, %language, "failed to save language preference");
        }
    }

    /// Picks the English or Hindi text.
    pub fn t<'a>(&self, en: &'a str, hi: &'a str) -> &'a str {
        self.language.pick(en, hi)
    }

    pub fn localized<'a>(&self, text: &'a Localized) -> &'a str {
        text.get(self.language)
    }

    pub fn text(&self, key: Text) -> &'static str {
        let (en, hi) = key.pair();
        self.language.pick(en, hi)
    }
}

/// Fixed storefront labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    Home,
    Products,
    Categories,
    Cart,
    TrackOrder,
    AddToCart,
    SelectWeight,
    FeaturedProducts,
    AllProducts,
    YourCart,
    EmptyCart,
    Quantity,
    Remove,
    RequestQuotation,
    ContinueShopping,
    CustomerDetails,
    FullName,
    MobileNumber,
    Email,
    Address,
    Notes,
    Submit,
    EnterDetails,
    OrderNumber,
    QuotationNumber,
    Track,
}

impl Text {
    fn pair(self) -> (&'static str, &'static str) {
        match self {
            Text::Home => ("Home", "होम"),
            Text::Products => ("Products", "उत्पाद"),
            Text::Categories => ("Categories", "श्रेणियाँ"),
            Text::Cart => ("Cart", "कार्ट"),
            Text::TrackOrder => ("Track Order", "ऑर्डर ट्रैक करें"),
            Text::AddToCart => ("Add to Cart", "कार्ट में जोड़ें"),
            Text::SelectWeight => ("Select Weight", "वजन चुनें"),
            Text::FeaturedProducts => ("Featured Products", "विशेष उत्पाद"),
            Text::AllProducts => ("All Products", "सभी उत्पाद"),
            Text::YourCart => ("Your Cart", "आपका कार्ट"),
            Text::EmptyCart => ("Your cart is empty", "आपका कार्ट खाली है"),
            Text::Quantity => ("Quantity", "मात्रा"),
            Text::Remove => ("Remove", "हटाएं"),
            Text::RequestQuotation => ("Request Quotation", "कोटेशन का अनुरोध करें"),
            Text::ContinueShopping => ("Continue Shopping", "खरीदारी जारी रखें"),
            Text::CustomerDetails => ("Customer Details", "ग्राहक विवरण"),
            Text::FullName => ("Full Name", "पूरा नाम"),
            Text::MobileNumber => ("Mobile Number", "मोबाइल नंबर"),
            Text::Email => ("Email (Optional)", "ईमेल (वैकल्पिक)"),
            Text::Address => ("Delivery Address", "डिलीवरी पता"),
            Text::Notes => ("Additional Notes", "अतिरिक्त नोट्स"),
            Text::Submit => ("Submit Request", "अनुरोध भेजें"),
            Text::EnterDetails => ("Enter your order details", "अपना ऑर्डर विवरण दर्ज करें"),
            Text::OrderNumber => ("Order Number", "ऑर्डर नंबर"),
            Text::QuotationNumber => ("Quotation Number", "कोटेशन नंबर"),
            Text::Track => ("Track", "ट्रैक करें"),
        }
    }

    pub fn localized(self) -> Localized {
        let (en, hi) = self.pair();
        Localized::new(en, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingStorage, InMemoryStorage};

    #[tokio::test]
    async fn defaults_to_english() {
        let pref = LanguagePreference::load(Arc::new(InMemoryStorage::new())).await;
        assert_eq!(pref.language(), Language::En);
        assert_eq!(pref.t("Cart", "कार्ट"), "Cart");
    }

    #[tokio::test]
    async fn choice_persists_across_loads() {
        let storage = Arc::new(InMemoryStorage::new());
        let mut pref = LanguagePreference::load(storage.clone()).await;
        pref.set(Language::Hi).await;

        assert_eq!(storage.get(LANGUAGE_KEY).await.unwrap().as_deref(), Some("hi"));
        let reloaded = LanguagePreference::load(storage).await;
        assert_eq!(reloaded.language(), Language::Hi);
        assert_eq!(reloaded.text(Text::Track), "ट्रैक करें");
    }

    #[tokio::test]
    async fn unknown_stored_code_falls_back() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.set(LANGUAGE_KEY, "fr".to_string()).await.unwrap();

        let pref = LanguagePreference::load(storage).await;
        assert_eq!(pref.language(), Language::En);
    }

    #[tokio::test]
    async fn storage_failure_keeps_in_memory_choice() {
        let mut pref = LanguagePreference::load(Arc::new(FailingStorage)).await;
        assert_eq!(pref.language(), Language::En);

        pref.set(Language::Hi).await;
        assert_eq!(pref.language(), Language::Hi);
        assert_eq!(pref.localized(&Text::Cart.localized()), "कार्ट");
    }
}

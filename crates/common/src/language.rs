use serde::{Deserialize, Serialize};

/// Storefront display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (default).
    #[default]
    En,
    /// Hindi.
    Hi,
}

impl Language {
    /// Returns the storage code (`"en"` / `"hi"`).
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    /// Parses a storage code. Anything other than `en`/`hi` is rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "hi" => Some(Language::Hi),
            _ => None,
        }
    }

    /// Picks between an English and a Hindi string.
    pub fn pick<'a>(&self, en: &'a str, hi: &'a str) -> &'a str {
        match self {
            Language::En => en,
            Language::Hi => hi,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A piece of text carried in both storefront languages.
///
/// Product names, variant labels and status labels are all stored this way so
/// a frozen quotation line renders the same in either language forever.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Localized {
    pub en: String,
    pub hi: String,
}

impl Localized {
    pub fn new(en: impl Into<String>, hi: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            hi: hi.into(),
        }
    }

    /// Returns the text for `language`.
    pub fn get(&self, language: Language) -> &str {
        language.pick(&self.en, &self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_language_is_english() {
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn language_codes_round_trip_through_storage_form() {
        for lang in [Language::En, Language::Hi] {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::from_code("EN"), None);
    }

    #[test]
    fn localized_picks_requested_language() {
        let text = Localized::new("Bhujia", "भुजिया");
        assert_eq!(text.get(Language::En), "Bhujia");
        assert_eq!(text.get(Language::Hi), "भुजिया");
    }

    #[test]
    fn language_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Language::Hi).unwrap(), "\"hi\"");
    }
}

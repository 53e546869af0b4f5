//! Customer contact details and field-level validation.
//!
//! Raw form input arrives as a [`ContactForm`]; [`ContactForm::validate`]
//! turns it into a [`CustomerContact`] or reports every failing field at once
//! with bilingual messages.

use std::sync::LazyLock;

use common::Localized;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("Invalid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Input field a validation message is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Mobile,
    Email,
    Address,
    Items,
    Number,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Mobile => "mobile",
            Field::Email => "email",
            Field::Address => "address",
            Field::Items => "items",
            Field::Number => "number",
        }
    }
}

/// One failing field and the message to show next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: Localized,
}

impl FieldError {
    pub fn new(field: Field, en: &str, hi: &str) -> Self {
        Self {
            field,
            message: Localized::new(en, hi),
        }
    }
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message recorded for `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// An Indian mobile number: ten digits, the first 6-9.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Parses a mobile number, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FieldError::new(
                Field::Mobile,
                "Mobile number is required",
                "मोबाइल नंबर आवश्यक है",
            ));
        }
        if !MOBILE_RE.is_match(trimmed) {
            return Err(FieldError::new(
                Field::Mobile,
                "Invalid mobile number",
                "अमान्य मोबाइल नंबर",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MobileNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).map_err(|e| e.message.en)
    }
}

impl From<MobileNumber> for String {
    fn from(m: MobileNumber) -> Self {
        m.0
    }
}

impl std::fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A syntactically plausible email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if !EMAIL_RE.is_match(trimmed) {
            return Err(FieldError::new(
                Field::Email,
                "Invalid email address",
                "अमान्य ईमेल पता",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).map_err(|e| e.message.en)
    }
}

impl From<Email> for String {
    fn from(e: Email) -> Self {
        e.0
    }
}

/// Validated contact details as stored on quotations and orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub mobile: MobileNumber,
    pub email: Option<Email>,
    pub address: Option<String>,
}

/// Contact details exactly as typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl ContactForm {
    /// Checks every field and reports all failures together.
    ///
    /// Name must be non-blank, mobile must match the ten-digit format, and
    /// email is optional but must look like an address when present. Blank
    /// optional fields become `None`.
    pub fn validate(&self) -> Result<CustomerContact, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new(Field::Name, "Name is required", "नाम आवश्यक है"));
        }

        let mobile = MobileNumber::parse(&self.mobile).map_err(|e| errors.push(e)).ok();

        let email = match non_blank(self.email.as_deref()) {
            Some(raw) => Email::parse(raw).map_err(|e| errors.push(e)).ok(),
            None => None,
        };

        match mobile {
            Some(mobile) if errors.is_empty() => Ok(CustomerContact {
                name: name.to_string(),
                mobile,
                email,
                address: non_blank(self.address.as_deref()).map(str::to_string),
            }),
            _ => Err(errors),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, mobile: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            mobile: mobile.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_form_produces_contact() {
        let contact = form("  Asha ", "9876543210").validate().unwrap();
        assert_eq!(contact.name, "Asha");
        assert_eq!(contact.mobile.as_str(), "9876543210");
        assert!(contact.email.is_none());
        assert!(contact.address.is_none());
    }

    #[test]
    fn mobile_must_start_with_six_to_nine() {
        for bad in ["5876543210", "987654321", "98765432101", "98765abcde", "+919876543210"] {
            let err = MobileNumber::parse(bad).unwrap_err();
            assert_eq!(err.message.en, "Invalid mobile number", "{bad}");
        }
        for good in ["6000000000", "7123456789", "8999999999", "9876543210"] {
            assert!(MobileNumber::parse(good).is_ok(), "{good}");
        }
    }

    #[test]
    fn blank_fields_report_required_messages_in_both_languages() {
        let errors = form("   ", "").validate().unwrap_err();

        let name = errors.for_field(Field::Name).unwrap();
        assert_eq!(name.message.en, "Name is required");
        assert_eq!(name.message.hi, "नाम आवश्यक है");

        let mobile = errors.for_field(Field::Mobile).unwrap();
        assert_eq!(mobile.message.en, "Mobile number is required");
        assert_eq!(mobile.message.hi, "मोबाइल नंबर आवश्यक है");
    }

    #[test]
    fn email_is_optional_but_checked_when_present() {
        let mut f = form("Asha", "9876543210");
        f.email = Some("   ".to_string());
        assert!(f.validate().unwrap().email.is_none());

        f.email = Some("asha@example.com".to_string());
        assert_eq!(f.validate().unwrap().email.unwrap().as_str(), "asha@example.com");

        f.email = Some("asha@example".to_string());
        let errors = f.validate().unwrap_err();
        assert_eq!(
            errors.for_field(Field::Email).unwrap().message.hi,
            "अमान्य ईमेल पता"
        );
    }

    #[test]
    fn all_failures_are_reported_together() {
        let mut f = form("", "12345");
        f.email = Some("nope".to_string());
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.errors.len(), 3);
    }

    #[test]
    fn mobile_deserialization_enforces_format() {
        assert!(serde_json::from_str::<MobileNumber>("\"9876543210\"").is_ok());
        assert!(serde_json::from_str::<MobileNumber>("\"1234567890\"").is_err());
    }
}

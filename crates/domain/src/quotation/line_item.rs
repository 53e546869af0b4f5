use std::collections::HashSet;

use common::Localized;
use serde::{Deserialize, Serialize};

use crate::catalog::{ProductId, VariantId};
use crate::contact::{Field, FieldError, ValidationErrors};
use crate::money::Money;

/// A quotation line as submitted by the storefront.
///
/// Any client-side line total is ignored; it is recomputed when the line is
/// frozen into a [`LineItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: Localized,
    pub variant_label: Localized,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Option<Money>,
}

impl NewLineItem {
    pub fn into_line_item(self) -> LineItem {
        LineItem {
            total_price: self.unit_price.map(|p| p.multiply(self.quantity)),
            product_id: self.product_id,
            variant_id: self.variant_id,
            product_name: self.product_name,
            variant_label: self.variant_label,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// A frozen quotation line. Names and labels are copied at submission so the
/// line reads the same after the catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: Localized,
    pub variant_label: Localized,
    pub quantity: u32,
    pub unit_price: Option<Money>,
    /// `unit_price × quantity` when priced.
    pub total_price: Option<Money>,
}

/// Largest quantity accepted on one line.
pub const MAX_LINE_QUANTITY: u32 = 10_000;

/// Sum of line totals, or `None` if any line is unpriced or there are no lines.
pub fn estimated_total(items: &[LineItem]) -> Option<Money> {
    if items.is_empty() {
        return None;
    }
    items.iter().map(|i| i.total_price).sum()
}

/// Rejects an empty list, zero or oversized quantities, negative prices,
/// amounts that do not fit in [`Money`] and repeated (product, variant)
/// pairs.
pub fn validate_lines(items: &[NewLineItem]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if items.is_empty() {
        errors.push(FieldError::new(
            Field::Items,
            "Your cart is empty",
            "आपकी कार्ट खाली है",
        ));
    }

    if items.iter().any(|i| i.quantity == 0) {
        errors.push(FieldError::new(
            Field::Items,
            "Quantity must be at least 1",
            "मात्रा कम से कम 1 होनी चाहिए",
        ));
    }

    let total_quantity = items
        .iter()
        .try_fold(0u32, |acc, i| acc.checked_add(i.quantity));
    if items.iter().any(|i| i.quantity > MAX_LINE_QUANTITY) || total_quantity.is_none() {
        errors.push(FieldError::new(
            Field::Items,
            "Quantity cannot exceed 10000 per item",
            "प्रति वस्तु मात्रा 10000 से अधिक नहीं हो सकती",
        ));
    }

    let line_totals: Option<Vec<Money>> = items
        .iter()
        .filter_map(|i| i.unit_price.map(|p| p.checked_multiply(i.quantity)))
        .collect();
    if line_totals.and_then(Money::checked_sum).is_none() {
        errors.push(FieldError::new(
            Field::Items,
            "Amount is too large",
            "राशि बहुत बड़ी है",
        ));
    }

    if items.iter().any(|i| i.unit_price.is_some_and(|p| p.is_negative())) {
        errors.push(FieldError::new(
            Field::Items,
            "Price cannot be negative",
            "मूल्य ऋणात्मक नहीं हो सकता",
        ));
    }

    let mut seen = HashSet::new();
    if !items.iter().all(|i| seen.insert((i.product_id, i.variant_id))) {
        errors.push(FieldError::new(
            Field::Items,
            "Each product size can appear only once",
            "प्रत्येक उत्पाद आकार केवल एक बार हो सकता है",
        ));
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: u32, unit_price: Option<i64>) -> NewLineItem {
        NewLineItem {
            product_id: ProductId::new(),
            variant_id: VariantId::new(),
            product_name: Localized::new("Bhujia", "भुजिया"),
            variant_label: Localized::new("500g", "500 ग्राम"),
            quantity,
            unit_price: unit_price.map(Money::from_rupees),
        }
    }

    #[test]
    fn total_is_recomputed_from_unit_price() {
        let item = line(2, Some(120)).into_line_item();
        assert_eq!(item.total_price, Some(Money::from_rupees(240)));

        let unpriced = line(3, None).into_line_item();
        assert_eq!(unpriced.total_price, None);
    }

    #[test]
    fn estimate_requires_every_line_priced() {
        let priced = vec![
            line(2, Some(120)).into_line_item(),
            line(1, Some(80)).into_line_item(),
        ];
        assert_eq!(estimated_total(&priced), Some(Money::from_rupees(320)));

        let mixed = vec![line(2, Some(120)).into_line_item(), line(1, None).into_line_item()];
        assert_eq!(estimated_total(&mixed), None);
        assert_eq!(estimated_total(&[]), None);
    }

    #[test]
    fn empty_list_is_invalid() {
        let errors = validate_lines(&[]).unwrap_err();
        assert_eq!(errors.errors[0].message.en, "Your cart is empty");
    }

    #[test]
    fn zero_quantity_is_invalid() {
        assert!(validate_lines(&[line(0, None)]).is_err());
    }

    #[test]
    fn oversized_quantity_is_invalid() {
        assert!(validate_lines(&[line(MAX_LINE_QUANTITY, Some(120))]).is_ok());

        let errors = validate_lines(&[line(3_000_000_000, None), line(3_000_000_000, None)])
            .unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, Field::Items);
        assert_eq!(errors.errors[0].message.en, "Quantity cannot exceed 10000 per item");
    }

    #[test]
    fn amount_overflow_is_invalid() {
        let mut pricey = line(2, None);
        pricey.unit_price = Some(Money::from_paise(i64::MAX));

        let errors = validate_lines(&[pricey]).unwrap_err();
        assert_eq!(errors.errors[0].message.en, "Amount is too large");
    }

    #[test]
    fn duplicate_pairs_are_invalid() {
        let a = line(1, None);
        let mut b = line(2, None);
        b.product_id = a.product_id;
        b.variant_id = a.variant_id;
        assert!(validate_lines(&[a.clone(), b]).is_err());

        // Same product, different size is fine.
        let mut c = line(2, None);
        c.product_id = a.product_id;
        assert!(validate_lines(&[a, c]).is_ok());
    }
}

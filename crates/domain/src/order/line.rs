use common::Localized;
use serde::{Deserialize, Serialize};

use crate::catalog::{ProductId, VariantId};
use crate::money::Money;

/// A priced order line. Unlike a quotation line, the total is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: Localized,
    pub variant_label: Localized,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
}

impl OrderLine {
    /// Builds a line with `total_price = unit_price × quantity`.
    pub fn priced(
        product_id: ProductId,
        variant_id: VariantId,
        product_name: Localized,
        variant_label: Localized,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id,
            variant_id,
            product_name,
            variant_label,
            quantity,
            unit_price,
            total_price: unit_price.multiply(quantity),
        }
    }

    /// `None` when the product does not fit in an amount.
    pub fn expected_total(&self) -> Option<Money> {
        self.unit_price.checked_multiply(self.quantity)
    }
}

//! Quotation-to-order conversion: step names, the staff request and the
//! mapping from an approved quotation to a `PlaceOrder` command.

use common::AggregateId;
use domain::{
    DocumentNumber, DomainError, Money, OrderError, OrderLine, PlaceOrder, ProductId, Quotation,
    QuotationLink, VariantId,
};
use serde::{Deserialize, Serialize};

use crate::error::SagaError;

/// Saga type name.
pub const SAGA_TYPE: &str = "QuotationConversion";

/// Step 1: place the order linked to the quotation.
pub const STEP_PLACE_ORDER: &str = "place_order";

/// Step 2: mark the quotation converted.
pub const STEP_MARK_CONVERTED: &str = "mark_converted";

/// Staff-supplied unit price for one quotation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePrice {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub unit_price: Money,
}

/// Everything staff provide when converting an approved quotation.
///
/// Lines without an entry in `line_prices` keep the unit price they were
/// quoted with. A blank `address` falls back to the one on the quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub quotation_id: AggregateId,
    #[serde(default)]
    pub line_prices: Vec<LinePrice>,
    pub gst_amount: Money,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

impl ConversionRequest {
    pub fn new(quotation_id: AggregateId, gst_amount: Money) -> Self {
        Self {
            quotation_id,
            line_prices: Vec::new(),
            gst_amount,
            address: None,
            admin_notes: None,
        }
    }

    pub fn with_price(mut self, product_id: ProductId, variant_id: VariantId, unit_price: Money) -> Self {
        self.line_prices.push(LinePrice {
            product_id,
            variant_id,
            unit_price,
        });
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_admin_notes(mut self, notes: impl Into<String>) -> Self {
        self.admin_notes = Some(notes.into());
        self
    }

    fn price_for(&self, product_id: ProductId, variant_id: VariantId) -> Option<Money> {
        self.line_prices
            .iter()
            .find(|p| p.product_id == product_id && p.variant_id == variant_id)
            .map(|p| p.unit_price)
    }
}

/// The result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Converted {
    pub saga_id: AggregateId,
    pub order_id: AggregateId,
    pub order_number: DocumentNumber,
}

/// Builds the order for an approved quotation.
///
/// Fails without side effects when the quotation is not approved, a line
/// has no price, the priced lines do not add up to the approved total, or
/// the resulting order would break an order invariant (e.g. no address).
pub fn build_order(quotation: &Quotation, request: &ConversionRequest) -> Result<PlaceOrder, SagaError> {
    let status = quotation.status();
    let (Some(approved), Some(contact), Some(number), true) = (
        quotation.approved_total(),
        quotation.contact(),
        quotation.number(),
        status.can_convert(),
    ) else {
        return Err(SagaError::QuotationNotApproved(status));
    };

    let known = |p: &LinePrice| {
        quotation
            .items()
            .iter()
            .any(|i| i.product_id == p.product_id && i.variant_id == p.variant_id)
    };
    if !request.line_prices.iter().all(known) {
        return Err(SagaError::UnknownLine);
    }

    let mut lines = Vec::with_capacity(quotation.items().len());
    for (index, item) in quotation.items().iter().enumerate() {
        let unit_price = request
            .price_for(item.product_id, item.variant_id)
            .or(item.unit_price)
            .ok_or_else(|| SagaError::MissingPrice {
                index,
                product: item.product_name.en.clone(),
            })?;
        if unit_price.checked_multiply(item.quantity).is_none() {
            return Err(DomainError::from(OrderError::AmountOverflow).into());
        }
        lines.push(OrderLine::priced(
            item.product_id,
            item.variant_id,
            item.product_name.clone(),
            item.variant_label.clone(),
            item.quantity,
            unit_price,
        ));
    }

    let line_total = Money::checked_sum(lines.iter().map(|l| l.total_price))
        .ok_or_else(|| DomainError::from(OrderError::AmountOverflow))?;
    if line_total != approved {
        return Err(SagaError::TotalMismatch {
            lines: line_total,
            approved,
        });
    }

    let mut contact = contact.clone();
    if let Some(address) = request.address.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        contact.address = Some(address.to_string());
    }

    let mut cmd = PlaceOrder::new(contact, lines, request.gst_amount).from_quotation(QuotationLink {
        quotation_id: request.quotation_id,
        quotation_number: number.clone(),
    });
    if let Some(notes) = quotation.customer_notes() {
        cmd = cmd.with_notes(notes);
    }
    if let Some(notes) = request.admin_notes.as_deref() {
        cmd = cmd.with_admin_notes(notes);
    }

    cmd.validate().map_err(DomainError::from)?;
    Ok(cmd)
}

//! Quotation aggregate implementation.

use chrono::{DateTime, Utc};
use common::AggregateId;
use event_store::Version;

use crate::aggregate::Aggregate;
use crate::contact::CustomerContact;
use crate::money::Money;
use crate::numbering::DocumentNumber;

use super::{
    LineItem, NewLineItem, QuotationError, QuotationEvent, QuotationRequestedData,
    QuotationStatus, line_item::estimated_total,
};

/// A customer's request for prices on a set of cart lines.
///
/// Lines are frozen at submission. Staff then approve (setting the
/// authoritative total) or reject, and an approved quotation may be converted
/// into an order exactly once.
#[derive(Debug, Clone, Default)]
pub struct Quotation {
    id: Option<AggregateId>,
    version: Version,
    number: Option<DocumentNumber>,
    contact: Option<CustomerContact>,
    items: Vec<LineItem>,
    total_items: u32,
    estimated_total: Option<Money>,
    approved_total: Option<Money>,
    status: QuotationStatus,
    customer_notes: Option<String>,
    admin_notes: Option<String>,
    order: Option<(AggregateId, DocumentNumber)>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Aggregate for Quotation {
    type Event = QuotationEvent;
    type Error = QuotationError;

    fn aggregate_type() -> &'static str {
        "Quotation"
    }

    fn id(&self) -> Option<AggregateId> {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            QuotationEvent::QuotationRequested(data) => self.apply_requested(data),
            QuotationEvent::QuotationApproved(data) => {
                self.status = QuotationStatus::Approved;
                self.approved_total = Some(data.approved_total);
                self.admin_notes = data.admin_notes;
                self.updated_at = Some(data.approved_at);
            }
            QuotationEvent::QuotationRejected(data) => {
                self.status = QuotationStatus::Rejected;
                self.admin_notes = data.admin_notes;
                self.updated_at = Some(data.rejected_at);
            }
            QuotationEvent::QuotationConverted(data) => {
                self.status = QuotationStatus::ConvertedToOrder;
                self.order = Some((data.order_id, data.order_number));
                self.updated_at = Some(data.converted_at);
            }
        }
    }
}

// Query methods
impl Quotation {
    pub fn number(&self) -> Option<&DocumentNumber> {
        self.number.as_ref()
    }

    pub fn contact(&self) -> Option<&CustomerContact> {
        self.contact.as_ref()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    pub fn estimated_total(&self) -> Option<Money> {
        self.estimated_total
    }

    pub fn approved_total(&self) -> Option<Money> {
        self.approved_total
    }

    pub fn status(&self) -> QuotationStatus {
        self.status
    }

    pub fn customer_notes(&self) -> Option<&str> {
        self.customer_notes.as_deref()
    }

    pub fn admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref()
    }

    /// The order created from this quotation, once converted.
    pub fn order(&self) -> Option<&(AggregateId, DocumentNumber)> {
        self.order.as_ref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

// Command methods (return events)
impl Quotation {
    /// Records a new quotation. Lines must already be validated.
    pub fn request(
        &self,
        quotation_id: AggregateId,
        number: DocumentNumber,
        contact: CustomerContact,
        lines: Vec<NewLineItem>,
        customer_notes: Option<String>,
    ) -> Result<Vec<QuotationEvent>, QuotationError> {
        if self.id.is_some() {
            return Err(QuotationError::AlreadyRequested);
        }

        let items: Vec<LineItem> = lines.into_iter().map(NewLineItem::into_line_item).collect();

        Ok(vec![QuotationEvent::QuotationRequested(
            QuotationRequestedData {
                quotation_id,
                number,
                contact,
                total_items: items.iter().map(|i| i.quantity).fold(0, u32::saturating_add),
                estimated_total: estimated_total(&items),
                items,
                customer_notes: customer_notes.filter(|n| !n.trim().is_empty()),
                requested_at: Utc::now(),
            },
        )])
    }

    pub fn approve(
        &self,
        approved_total: Money,
        admin_notes: Option<String>,
    ) -> Result<Vec<QuotationEvent>, QuotationError> {
        self.ensure_exists()?;
        if !self.status.can_approve() {
            return Err(QuotationError::InvalidStateTransition {
                current_state: self.status,
                action: "approve",
            });
        }
        if !approved_total.is_positive() {
            return Err(QuotationError::InvalidApprovedTotal(approved_total));
        }

        Ok(vec![QuotationEvent::approved(approved_total, admin_notes)])
    }

    pub fn reject(&self, admin_notes: Option<String>) -> Result<Vec<QuotationEvent>, QuotationError> {
        self.ensure_exists()?;
        if !self.status.can_reject() {
            return Err(QuotationError::InvalidStateTransition {
                current_state: self.status,
                action: "reject",
            });
        }

        Ok(vec![QuotationEvent::rejected(admin_notes)])
    }

    pub fn mark_converted(
        &self,
        order_id: AggregateId,
        order_number: DocumentNumber,
    ) -> Result<Vec<QuotationEvent>, QuotationError> {
        self.ensure_exists()?;
        if !self.status.can_convert() {
            return Err(QuotationError::InvalidStateTransition {
                current_state: self.status,
                action: "convert",
            });
        }

        Ok(vec![QuotationEvent::converted(order_id, order_number)])
    }

    fn ensure_exists(&self) -> Result<(), QuotationError> {
        match self.id {
            Some(_) => Ok(()),
            None => Err(QuotationError::NotFound),
        }
    }
}

// Apply event helpers
impl Quotation {
    fn apply_requested(&mut self, data: QuotationRequestedData) {
        self.id = Some(data.quotation_id);
        self.number = Some(data.number);
        self.contact = Some(data.contact);
        self.items = data.items;
        self.total_items = data.total_items;
        self.estimated_total = data.estimated_total;
        self.status = QuotationStatus::Requested;
        self.customer_notes = data.customer_notes;
        self.created_at = Some(data.requested_at);
        self.updated_at = Some(data.requested_at);
    }
}

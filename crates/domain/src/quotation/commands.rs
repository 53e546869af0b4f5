//! Quotation commands.

use common::AggregateId;

use crate::command::Command;
use crate::contact::ContactForm;
use crate::money::Money;
use crate::numbering::DocumentNumber;

use super::{NewLineItem, Quotation};

/// Customer checkout: contact details plus cart lines.
#[derive(Debug, Clone)]
pub struct RequestQuotation {
    pub quotation_id: AggregateId,
    pub contact: ContactForm,
    pub items: Vec<NewLineItem>,
    pub customer_notes: Option<String>,
}

impl RequestQuotation {
    /// Creates the command with a freshly generated quotation ID.
    pub fn new(contact: ContactForm, items: Vec<NewLineItem>) -> Self {
        Self {
            quotation_id: AggregateId::new(),
            contact,
            items,
            customer_notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.customer_notes = Some(notes.into());
        self
    }
}

impl Command for RequestQuotation {
    type Aggregate = Quotation;

    fn aggregate_id(&self) -> AggregateId {
        self.quotation_id
    }
}

#[derive(Debug, Clone)]
pub struct ApproveQuotation {
    pub quotation_id: AggregateId,
    pub approved_total: Money,
    pub admin_notes: Option<String>,
}

impl ApproveQuotation {
    pub fn new(quotation_id: AggregateId, approved_total: Money) -> Self {
        Self {
            quotation_id,
            approved_total,
            admin_notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.admin_notes = Some(notes.into());
        self
    }
}

impl Command for ApproveQuotation {
    type Aggregate = Quotation;

    fn aggregate_id(&self) -> AggregateId {
        self.quotation_id
    }
}

#[derive(Debug, Clone)]
pub struct RejectQuotation {
    pub quotation_id: AggregateId,
    pub admin_notes: Option<String>,
}

impl RejectQuotation {
    pub fn new(quotation_id: AggregateId) -> Self {
        Self {
            quotation_id,
            admin_notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.admin_notes = Some(notes.into());
        self
    }
}

impl Command for RejectQuotation {
    type Aggregate = Quotation;

    fn aggregate_id(&self) -> AggregateId {
        self.quotation_id
    }
}

/// Links an approved quotation to the order placed from it.
#[derive(Debug, Clone)]
pub struct MarkQuotationConverted {
    pub quotation_id: AggregateId,
    pub order_id: AggregateId,
    pub order_number: DocumentNumber,
}

impl MarkQuotationConverted {
    pub fn new(quotation_id: AggregateId, order_id: AggregateId, order_number: DocumentNumber) -> Self {
        Self {
            quotation_id,
            order_id,
            order_number,
        }
    }
}

impl Command for MarkQuotationConverted {
    type Aggregate = Quotation;

    fn aggregate_id(&self) -> AggregateId {
        self.quotation_id
    }
}

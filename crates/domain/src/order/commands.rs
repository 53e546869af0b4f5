//! Order commands.

use common::AggregateId;

use crate::command::Command;
use crate::contact::CustomerContact;
use crate::money::Money;

use super::{Order, OrderError, OrderLine, QuotationLink};

/// Creates an order. Amounts are supplied by staff and checked, never derived
/// silently.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub order_id: AggregateId,
    pub contact: CustomerContact,
    pub lines: Vec<OrderLine>,
    pub total_amount: Money,
    pub gst_amount: Money,
    pub final_amount: Money,
    pub quotation: Option<QuotationLink>,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
}

impl PlaceOrder {
    /// Builds a consistent command: total is the sum of the lines and final is
    /// total plus GST.
    pub fn new(contact: CustomerContact, lines: Vec<OrderLine>, gst_amount: Money) -> Self {
        let total_amount: Money = lines.iter().map(|l| l.total_price).sum();
        Self {
            order_id: AggregateId::new(),
            contact,
            lines,
            total_amount,
            gst_amount,
            final_amount: total_amount + gst_amount,
            quotation: None,
            notes: None,
            admin_notes: None,
        }
    }

    pub fn with_order_id(mut self, order_id: AggregateId) -> Self {
        self.order_id = order_id;
        self
    }

    pub fn from_quotation(mut self, link: QuotationLink) -> Self {
        self.quotation = Some(link);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_admin_notes(mut self, notes: impl Into<String>) -> Self {
        self.admin_notes = Some(notes.into());
        self
    }

    /// Checks the creation invariants without touching any store.
    pub fn validate(&self) -> Result<(), OrderError> {
        let has_address = self
            .contact
            .address
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty());
        if !has_address {
            return Err(OrderError::MissingAddress);
        }

        if self.lines.is_empty() {
            return Err(OrderError::NoLines);
        }

        for (index, line) in self.lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(OrderError::InvalidQuantity { index });
            }
            if line.unit_price.is_negative() {
                return Err(OrderError::NegativeAmount);
            }
            let expected = line.expected_total().ok_or(OrderError::AmountOverflow)?;
            if line.total_price != expected {
                return Err(OrderError::LineTotalMismatch {
                    index,
                    expected,
                    actual: line.total_price,
                });
            }
        }

        if self.gst_amount.is_negative() {
            return Err(OrderError::NegativeAmount);
        }

        let lines = Money::checked_sum(self.lines.iter().map(|l| l.total_price))
            .ok_or(OrderError::AmountOverflow)?;
        if lines != self.total_amount {
            return Err(OrderError::TotalMismatch {
                lines,
                total: self.total_amount,
            });
        }

        let expected_final = self
            .total_amount
            .checked_add(self.gst_amount)
            .ok_or(OrderError::AmountOverflow)?;
        if self.final_amount != expected_final {
            return Err(OrderError::FinalAmountMismatch {
                total: self.total_amount,
                gst: self.gst_amount,
                final_amount: self.final_amount,
            });
        }

        Ok(())
    }
}

impl Command for PlaceOrder {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

#[derive(Debug, Clone)]
pub struct DispatchOrder {
    pub order_id: AggregateId,
    pub tracking_number: Option<String>,
}

impl DispatchOrder {
    pub fn new(order_id: AggregateId) -> Self {
        Self {
            order_id,
            tracking_number: None,
        }
    }

    pub fn with_tracking_number(mut self, tracking_number: impl Into<String>) -> Self {
        self.tracking_number = Some(tracking_number.into());
        self
    }
}

impl Command for DispatchOrder {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

#[derive(Debug, Clone)]
pub struct DeliverOrder {
    pub order_id: AggregateId,
}

impl DeliverOrder {
    pub fn new(order_id: AggregateId) -> Self {
        Self { order_id }
    }
}

impl Command for DeliverOrder {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

#[derive(Debug, Clone)]
pub struct CancelOrder {
    pub order_id: AggregateId,
    pub reason: String,
}

impl CancelOrder {
    pub fn new(order_id: AggregateId, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            reason: reason.into(),
        }
    }
}

impl Command for CancelOrder {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

#[derive(Debug, Clone)]
pub struct RecordPayment {
    pub order_id: AggregateId,
    pub reference: Option<String>,
}

impl RecordPayment {
    pub fn new(order_id: AggregateId) -> Self {
        Self {
            order_id,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

impl Command for RecordPayment {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

#[derive(Debug, Clone)]
pub struct RefundPayment {
    pub order_id: AggregateId,
    pub reason: Option<String>,
}

impl RefundPayment {
    pub fn new(order_id: AggregateId) -> Self {
        Self {
            order_id,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl Command for RefundPayment {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

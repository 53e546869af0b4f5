//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::AggregateId;
use event_store::Version;

use crate::aggregate::Aggregate;
use crate::contact::CustomerContact;
use crate::money::Money;
use crate::numbering::DocumentNumber;

use super::{
    FulfillmentStatus, OrderError, OrderEvent, OrderLine, OrderPlacedData, PaymentStatus,
    PlaceOrder, QuotationLink,
};

/// A priced, confirmed purchase.
///
/// Amounts are fixed when the order is placed. Fulfillment and payment move
/// on separate axes and never change them.
#[derive(Debug, Clone, Default)]
pub struct Order {
    id: Option<AggregateId>,
    version: Version,
    number: Option<DocumentNumber>,
    contact: Option<CustomerContact>,
    lines: Vec<OrderLine>,
    total_amount: Money,
    gst_amount: Money,
    final_amount: Money,
    status: FulfillmentStatus,
    payment_status: PaymentStatus,
    tracking_number: Option<String>,
    dispatched_unpaid: bool,
    quotation: Option<QuotationLink>,
    notes: Option<String>,
    admin_notes: Option<String>,
    cancellation_reason: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Aggregate for Order {
    type Event = OrderEvent;
    type Error = OrderError;

    fn aggregate_type() -> &'static str {
        "Order"
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
            OrderEvent::OrderPlaced(data) => self.apply_placed(data),
            OrderEvent::OrderDispatched(data) => {
                self.status = FulfillmentStatus::Dispatched;
                self.tracking_number = data.tracking_number;
                self.dispatched_unpaid = data.payment_pending;
                self.updated_at = Some(data.dispatched_at);
            }
            OrderEvent::OrderDelivered(data) => {
                self.status = FulfillmentStatus::Delivered;
                self.updated_at = Some(data.delivered_at);
            }
            OrderEvent::OrderCancelled(data) => {
                self.status = FulfillmentStatus::Cancelled;
                self.cancellation_reason = Some(data.reason);
                self.updated_at = Some(data.cancelled_at);
            }
            OrderEvent::PaymentRecorded(data) => {
                self.payment_status = PaymentStatus::Paid;
                self.updated_at = Some(data.paid_at);
            }
            OrderEvent::PaymentRefunded(data) => {
                self.payment_status = PaymentStatus::Refunded;
                self.updated_at = Some(data.refunded_at);
            }
        }
    }
}

// Query methods
impl Order {
    pub fn number(&self) -> Option<&DocumentNumber> {
        self.number.as_ref()
    }

    pub fn contact(&self) -> Option<&CustomerContact> {
        self.contact.as_ref()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn gst_amount(&self) -> Money {
        self.gst_amount
    }

    pub fn final_amount(&self) -> Money {
        self.final_amount
    }

    pub fn status(&self) -> FulfillmentStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    /// True if the order was dispatched before payment was recorded.
    pub fn dispatched_unpaid(&self) -> bool {
        self.dispatched_unpaid
    }

    pub fn quotation(&self) -> Option<&QuotationLink> {
        self.quotation.as_ref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref()
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

// Command methods (return events)
impl Order {
    pub fn place(&self, number: DocumentNumber, cmd: PlaceOrder) -> Result<Vec<OrderEvent>, OrderError> {
        if self.id.is_some() {
            return Err(OrderError::AlreadyPlaced);
        }
        cmd.validate()?;

        Ok(vec![OrderEvent::OrderPlaced(OrderPlacedData {
            order_id: cmd.order_id,
            number,
            contact: cmd.contact,
            lines: cmd.lines,
            total_amount: cmd.total_amount,
            gst_amount: cmd.gst_amount,
            final_amount: cmd.final_amount,
            quotation: cmd.quotation,
            notes: cmd.notes.filter(|n| !n.trim().is_empty()),
            admin_notes: cmd.admin_notes.filter(|n| !n.trim().is_empty()),
            placed_at: Utc::now(),
        })])
    }

    /// Dispatch is allowed while payment is pending; the event records it.
    pub fn dispatch(&self, tracking_number: Option<String>) -> Result<Vec<OrderEvent>, OrderError> {
        self.ensure_exists()?;
        if !self.status.can_dispatch() {
            return Err(OrderError::InvalidStateTransition {
                current_state: self.status,
                action: "dispatch",
            });
        }

        let tracking_number = tracking_number
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let payment_pending = self.payment_status == PaymentStatus::Pending;

        Ok(vec![OrderEvent::dispatched(tracking_number, payment_pending)])
    }

    pub fn deliver(&self) -> Result<Vec<OrderEvent>, OrderError> {
        self.ensure_exists()?;
        if !self.status.can_deliver() {
            return Err(OrderError::InvalidStateTransition {
                current_state: self.status,
                action: "deliver",
            });
        }

        Ok(vec![OrderEvent::delivered()])
    }

    pub fn cancel(&self, reason: String) -> Result<Vec<OrderEvent>, OrderError> {
        self.ensure_exists()?;
        if !self.status.can_cancel() {
            return Err(OrderError::InvalidStateTransition {
                current_state: self.status,
                action: "cancel",
            });
        }

        Ok(vec![OrderEvent::cancelled(reason)])
    }

    pub fn record_payment(&self, reference: Option<String>) -> Result<Vec<OrderEvent>, OrderError> {
        self.ensure_exists()?;
        if !self.payment_status.can_mark_paid() {
            return Err(OrderError::InvalidPaymentTransition {
                current_state: self.payment_status,
                action: "record payment",
            });
        }

        Ok(vec![OrderEvent::payment_recorded(reference)])
    }

    pub fn refund_payment(&self, reason: Option<String>) -> Result<Vec<OrderEvent>, OrderError> {
        self.ensure_exists()?;
        if !self.payment_status.can_refund() {
            return Err(OrderError::InvalidPaymentTransition {
                current_state: self.payment_status,
                action: "refund",
            });
        }

        Ok(vec![OrderEvent::payment_refunded(reason)])
    }

    fn ensure_exists(&self) -> Result<(), OrderError> {
        match self.id {
            Some(_) => Ok(()),
            None => Err(OrderError::NotFound),
        }
    }
}

// Apply event helpers
impl Order {
    fn apply_placed(&mut self, data: OrderPlacedData) {
        self.id = Some(data.order_id);
        self.number = Some(data.number);
        self.contact = Some(data.contact);
        self.lines = data.lines;
        self.total_amount = data.total_amount;
        self.gst_amount = data.gst_amount;
        self.final_amount = data.final_amount;
        self.status = FulfillmentStatus::Processing;
        self.payment_status = PaymentStatus::Pending;
        self.quotation = data.quotation;
        self.notes = data.notes;
        self.admin_notes = data.admin_notes;
        self.created_at = Some(data.placed_at);
        self.updated_at = Some(data.placed_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductId, VariantId};
    use crate::contact::ContactForm;
    use crate::numbering::DocumentKind;
    use chrono::NaiveDate;
    use common::Localized;

    fn contact(address: Option<&str>) -> CustomerContact {
        ContactForm {
            name: "Asha".to_string(),
            mobile: "9876543210".to_string(),
            address: address.map(str::to_string),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    fn bhujia(quantity: u32, rupees: i64) -> OrderLine {
        OrderLine::priced(
            ProductId::new(),
            VariantId::new(),
            Localized::new("Bhujia", "भुजिया"),
            Localized::new("500g", "500 ग्राम"),
            quantity,
            Money::from_rupees(rupees),
        )
    }

    fn number() -> DocumentNumber {
        DocumentNumber::new(
            DocumentKind::Order,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            1,
        )
    }

    fn placed() -> Order {
        let cmd = PlaceOrder::new(
            contact(Some("12 MG Road, Jaipur")),
            vec![bhujia(2, 115)],
            Money::from_paise(1150),
        );
        let mut order = Order::default();
        order.apply_events(order.place(number(), cmd).unwrap());
        order
    }

    #[test]
    fn place_fixes_amounts() {
        let order = placed();
        assert_eq!(order.status(), FulfillmentStatus::Processing);
        assert_eq!(order.payment_status(), PaymentStatus::Pending);
        assert_eq!(order.total_amount(), Money::from_rupees(230));
        assert_eq!(order.final_amount(), Money::from_paise(24_150));
        assert_eq!(order.number().map(|n| n.as_str()), Some("ORD-20250101-0001"));
    }

    #[test]
    fn place_requires_address() {
        let cmd = PlaceOrder::new(contact(None), vec![bhujia(1, 120)], Money::zero());
        assert!(matches!(
            Order::default().place(number(), cmd),
            Err(OrderError::MissingAddress)
        ));

        let cmd = PlaceOrder::new(contact(Some("   ")), vec![bhujia(1, 120)], Money::zero());
        assert!(matches!(
            Order::default().place(number(), cmd),
            Err(OrderError::MissingAddress)
        ));
    }

    #[test]
    fn place_rejects_inconsistent_amounts() {
        let address = Some("Jaipur");

        let cmd = PlaceOrder::new(contact(address), vec![], Money::zero());
        assert!(matches!(cmd.validate(), Err(OrderError::NoLines)));

        let mut line = bhujia(2, 120);
        line.total_price = Money::from_rupees(200);
        let cmd = PlaceOrder::new(contact(address), vec![line], Money::zero());
        assert!(matches!(cmd.validate(), Err(OrderError::LineTotalMismatch { index: 0, .. })));

        let mut cmd = PlaceOrder::new(contact(address), vec![bhujia(2, 120)], Money::zero());
        cmd.total_amount = Money::from_rupees(230);
        assert!(matches!(cmd.validate(), Err(OrderError::TotalMismatch { .. })));

        let mut cmd = PlaceOrder::new(contact(address), vec![bhujia(2, 120)], Money::from_rupees(12));
        cmd.final_amount = Money::from_rupees(240);
        assert!(matches!(cmd.validate(), Err(OrderError::FinalAmountMismatch { .. })));
    }

    #[test]
    fn place_rejects_amounts_that_overflow() {
        let address = Some("Jaipur");

        let mut line = bhujia(2, 0);
        line.unit_price = Money::from_paise(i64::MAX);
        line.total_price = Money::from_paise(i64::MAX);
        let cmd = PlaceOrder::new(contact(address), vec![line], Money::zero());
        assert!(matches!(cmd.validate(), Err(OrderError::AmountOverflow)));

        let mut half = bhujia(1, 0);
        half.unit_price = Money::from_paise(i64::MAX / 2 + 1);
        half.total_price = half.unit_price;
        let cmd = PlaceOrder::new(contact(address), vec![half.clone(), half], Money::zero());
        assert!(matches!(cmd.validate(), Err(OrderError::AmountOverflow)));

        let cmd = PlaceOrder::new(
            contact(address),
            vec![bhujia(2, 120)],
            Money::from_paise(i64::MAX),
        );
        assert!(matches!(cmd.validate(), Err(OrderError::AmountOverflow)));

        let order = Order::default();
        assert!(matches!(order.place(number(), cmd), Err(OrderError::AmountOverflow)));
    }

    #[test]
    fn place_twice_is_rejected() {
        let order = placed();
        let cmd = PlaceOrder::new(contact(Some("Jaipur")), vec![bhujia(1, 120)], Money::zero());
        assert!(matches!(order.place(number(), cmd), Err(OrderError::AlreadyPlaced)));
    }

    #[test]
    fn dispatch_while_unpaid_is_flagged() {
        let mut order = placed();
        let events = order.dispatch(Some(" DTDC123 ".to_string())).unwrap();
        match &events[0] {
            OrderEvent::OrderDispatched(data) => assert!(data.payment_pending),
            other => panic!("unexpected event {other:?}"),
        }
        order.apply_events(events);

        assert_eq!(order.status(), FulfillmentStatus::Dispatched);
        assert_eq!(order.tracking_number(), Some("DTDC123"));
        assert!(order.dispatched_unpaid());
    }

    #[test]
    fn dispatch_after_payment_is_not_flagged() {
        let mut order = placed();
        order.apply_events(order.record_payment(None).unwrap());
        order.apply_events(order.dispatch(None).unwrap());

        assert!(!order.dispatched_unpaid());
        assert_eq!(order.tracking_number(), None);
    }

    #[test]
    fn fulfillment_path_keeps_amounts() {
        let mut order = placed();
        let final_amount = order.final_amount();

        order.apply_events(order.dispatch(None).unwrap());
        order.apply_events(order.deliver().unwrap());

        assert_eq!(order.status(), FulfillmentStatus::Delivered);
        assert_eq!(order.final_amount(), final_amount);
        assert_eq!(order.final_amount(), order.total_amount() + order.gst_amount());
        assert!(order.cancel("too late".to_string()).is_err());
        assert!(order.dispatch(None).is_err());
    }

    #[test]
    fn deliver_requires_dispatch() {
        let order = placed();
        assert!(matches!(
            order.deliver(),
            Err(OrderError::InvalidStateTransition {
                current_state: FulfillmentStatus::Processing,
                action: "deliver"
            })
        ));
    }

    #[test]
    fn cancel_from_dispatched() {
        let mut order = placed();
        order.apply_events(order.dispatch(None).unwrap());
        order.apply_events(order.cancel("customer refused".to_string()).unwrap());

        assert_eq!(order.status(), FulfillmentStatus::Cancelled);
        assert_eq!(order.cancellation_reason(), Some("customer refused"));
        assert!(order.deliver().is_err());
    }

    #[test]
    fn refund_only_after_payment() {
        let mut order = placed();
        assert!(matches!(
            order.refund_payment(None),
            Err(OrderError::InvalidPaymentTransition {
                current_state: PaymentStatus::Pending,
                ..
            })
        ));

        order.apply_events(order.record_payment(Some("UPI-991".to_string())).unwrap());
        assert!(order.record_payment(None).is_err());
        order.apply_events(order.refund_payment(None).unwrap());
        assert_eq!(order.payment_status(), PaymentStatus::Refunded);
        assert!(order.refund_payment(None).is_err());
    }

    #[test]
    fn commands_on_missing_order_are_not_found() {
        let order = Order::default();
        assert!(matches!(order.dispatch(None), Err(OrderError::NotFound)));
        assert!(matches!(order.record_payment(None), Err(OrderError::NotFound)));
    }
}

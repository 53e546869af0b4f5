//! Integration tests: domain services → ProjectionProcessor → views and tracking.

use std::sync::Arc;

use common::Localized;
use domain::{
    ApproveQuotation, ContactForm, DispatchOrder, FulfillmentStatus, MarkQuotationConverted,
    Money, NewLineItem, OrderLine, OrderService, PaymentStatus, PlaceOrder, ProductId,
    QuotationLink, QuotationService, QuotationStatus, RecordPayment, RequestQuotation, VariantId,
};
use event_store::{InMemoryEventStore, InMemoryNumberSequence};
use projections::{
    DashboardView, OrdersView, ProjectionProcessor, QuotationsView, TrackedDocument,
    TrackingError, TrackingLookup,
};

struct Harness {
    quotations: QuotationService<InMemoryEventStore>,
    orders: OrderService<InMemoryEventStore>,
    processor: ProjectionProcessor<InMemoryEventStore>,
    quotation_view: QuotationsView,
    order_view: OrdersView,
}

fn setup() -> Harness {
    let store = InMemoryEventStore::new();
    let numbers = Arc::new(InMemoryNumberSequence::new());

    let quotation_view = QuotationsView::new();
    let order_view = OrdersView::new();

    let mut processor = ProjectionProcessor::new(store.clone());
    processor.register(Box::new(quotation_view.clone()));
    processor.register(Box::new(order_view.clone()));

    Harness {
        quotations: QuotationService::new(store.clone(), numbers.clone()),
        orders: OrderService::new(store, numbers),
        processor,
        quotation_view,
        order_view,
    }
}

fn asha() -> ContactForm {
    ContactForm {
        name: "Asha".to_string(),
        mobile: "9876543210".to_string(),
        address: Some("12 MG Road, Jaipur".to_string()),
        ..Default::default()
    }
}

fn bhujia(quantity: u32) -> NewLineItem {
    NewLineItem {
        product_id: ProductId::new(),
        variant_id: VariantId::new(),
        product_name: Localized::new("Bhujia", "भुजिया"),
        variant_label: Localized::new("500g", "500 ग्राम"),
        quantity,
        unit_price: Some(Money::from_rupees(120)),
    }
}

#[tokio::test]
async fn quotation_to_order_across_all_views() {
    let h = setup();

    let cmd = RequestQuotation::new(asha(), vec![bhujia(2)]);
    let quotation_id = cmd.quotation_id;
    let submitted = h.quotations.submit_quotation(cmd).await.unwrap();
    let quotation_number = submitted.aggregate.number().unwrap().clone();

    h.quotations
        .approve_quotation(ApproveQuotation::new(quotation_id, Money::from_rupees(230)))
        .await
        .unwrap();

    let line = &submitted.aggregate.items()[0];
    let order_line = OrderLine::priced(
        line.product_id,
        line.variant_id,
        line.product_name.clone(),
        line.variant_label.clone(),
        line.quantity,
        Money::from_rupees(115),
    );
    let contact = asha().validate().unwrap();
    let cmd = PlaceOrder::new(contact, vec![order_line], Money::from_paise(1150)).from_quotation(
        QuotationLink {
            quotation_id,
            quotation_number: quotation_number.clone(),
        },
    );
    let order_id = cmd.order_id;
    let placed = h.orders.place_order(cmd).await.unwrap();
    let order_number = placed.aggregate.number().unwrap().clone();

    h.quotations
        .mark_converted(MarkQuotationConverted::new(
            quotation_id,
            order_id,
            order_number.clone(),
        ))
        .await
        .unwrap();
    h.orders
        .dispatch_order(DispatchOrder::new(order_id).with_tracking_number("DTDC123"))
        .await
        .unwrap();
    h.orders
        .record_payment(RecordPayment::new(order_id))
        .await
        .unwrap();

    h.processor.run_catch_up().await.unwrap();

    let quotation = h.quotation_view.get(quotation_id).await.unwrap();
    assert_eq!(quotation.status, QuotationStatus::ConvertedToOrder);
    assert_eq!(quotation.order_number.as_ref(), Some(&order_number));

    let order = h.order_view.get(order_id).await.unwrap();
    assert_eq!(order.status, FulfillmentStatus::Dispatched);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert!(order.dispatched_unpaid);
    assert_eq!(
        order.quotation.as_ref().map(|l| &l.quotation_number),
        Some(&quotation_number)
    );

    let dashboard = DashboardView::new(h.quotation_view.clone(), h.order_view.clone());
    let stats = dashboard.stats().await;
    assert_eq!(stats.total_quotations, 1);
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.quotations_by_status.get("converted_to_order"), Some(&1));

    let tracking = TrackingLookup::new(h.quotation_view.clone(), h.order_view.clone());
    let found = tracking
        .lookup(order_number.as_str(), "9876543210")
        .await
        .unwrap();
    assert!(matches!(found, TrackedDocument::Order(_)));
}

#[tokio::test]
async fn tracking_sees_new_quotations_after_catch_up() {
    let h = setup();
    let tracking = TrackingLookup::new(h.quotation_view.clone(), h.order_view.clone());

    let result = h
        .quotations
        .submit_quotation(RequestQuotation::new(asha(), vec![bhujia(1)]))
        .await
        .unwrap();
    let number = result.aggregate.number().unwrap().as_str().to_lowercase();

    // Views lag until catch-up runs.
    assert!(matches!(
        tracking.lookup(&number, "9876543210").await,
        Err(TrackingError::NotFound { .. })
    ));

    h.processor.run_catch_up().await.unwrap();

    let found = tracking.lookup(&number, "9876543210").await.unwrap();
    match found {
        TrackedDocument::Quotation(q) => {
            assert_eq!(q.status, QuotationStatus::Requested);
            assert_eq!(q.total_items, 1);
        }
        other => panic!("expected quotation, got {other:?}"),
    }
}

#[tokio::test]
async fn rebuild_produces_identical_views() {
    let h = setup();
    for quantity in 1..=3 {
        h.quotations
            .submit_quotation(RequestQuotation::new(asha(), vec![bhujia(quantity)]))
            .await
            .unwrap();
    }

    h.processor.run_catch_up().await.unwrap();
    let before: Vec<_> = h
        .quotation_view
        .list()
        .await
        .into_iter()
        .map(|q| (q.number, q.total_items))
        .collect();

    h.processor.rebuild_all().await.unwrap();
    let after: Vec<_> = h
        .quotation_view
        .list()
        .await
        .into_iter()
        .map(|q| (q.number, q.total_items))
        .collect();

    assert_eq!(before.len(), 3);
    assert_eq!(before, after);
}

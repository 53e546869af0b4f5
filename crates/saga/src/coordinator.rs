//! Saga coordinator for quotation-to-order conversion.

use std::sync::Arc;

use common::AggregateId;
use domain::{
    Aggregate, CancelOrder, DomainError, DomainEvent, FulfillmentStatus, MarkQuotationConverted,
    OrderError, OrderService, QuotationService,
};
use event_store::{AppendOptions, EventEnvelope, EventStore, NumberSequence, Version};

use crate::aggregate::SagaInstance;
use crate::conversion::{
    self, ConversionRequest, Converted, STEP_MARK_CONVERTED, STEP_PLACE_ORDER,
};
use crate::error::SagaError;
use crate::events::SagaEvent;

/// Converts approved quotations into orders.
///
/// The conversion runs two steps: place an order linked to the quotation,
/// then mark the quotation converted. When the second step fails, or the
/// saga cannot be recorded before it runs, the order is cancelled. Every step is recorded on an event-sourced
/// [`SagaInstance`] in the same store.
pub struct ConversionCoordinator<S: EventStore> {
    store: S,
    quotations: QuotationService<S>,
    orders: OrderService<S>,
}

impl<S: EventStore + Clone> ConversionCoordinator<S> {
    pub fn new(store: S, numbers: Arc<dyn NumberSequence>) -> Self {
        Self {
            quotations: QuotationService::new(store.clone(), numbers.clone()),
            orders: OrderService::new(store.clone(), numbers),
            store,
        }
    }

    /// Converts the quotation named in `request` into an order.
    ///
    /// The quotation is checked and the order built before any saga event is
    /// written, so a refused conversion leaves no trace. Once the saga has
    /// started every outcome is recorded.
    #[tracing::instrument(skip(self, request), fields(saga_type = conversion::SAGA_TYPE, quotation_id = %request.quotation_id))]
    pub async fn convert(&self, request: ConversionRequest) -> Result<Converted, SagaError> {
        let saga_start = std::time::Instant::now();

        let quotation = self
            .quotations
            .get_quotation(request.quotation_id)
            .await?
            .ok_or(SagaError::QuotationNotFound(request.quotation_id))?;
        let cmd = conversion::build_order(&quotation, &request)?;
        let order_id = cmd.order_id;

        metrics::counter!("conversion_saga_started_total").increment(1);
        let saga_id = AggregateId::new();
        let mut saga = SagaInstance::default();
        let mut version = Version::initial();

        self.record(
            saga_id,
            &mut saga,
            &mut version,
            SagaEvent::saga_started(saga_id, request.quotation_id, conversion::SAGA_TYPE),
        )
        .await?;

        // Step 1: place the order
        tracing::info!(step = STEP_PLACE_ORDER, "saga step started");
        self.record(saga_id, &mut saga, &mut version, SagaEvent::step_started(STEP_PLACE_ORDER))
            .await?;

        let placed = self.orders.place_order(cmd).await.and_then(|result| {
            result
                .aggregate
                .number()
                .cloned()
                .ok_or(DomainError::Order(OrderError::NotFound))
        });
        let order_number = match placed {
            Ok(number) => number,
            Err(e) => {
                self.record(
                    saga_id,
                    &mut saga,
                    &mut version,
                    SagaEvent::step_failed(STEP_PLACE_ORDER, e.to_string()),
                )
                .await?;
                self.record(
                    saga_id,
                    &mut saga,
                    &mut version,
                    SagaEvent::saga_failed(format!("Step failed: {STEP_PLACE_ORDER}")),
                )
                .await?;
                metrics::histogram!("conversion_saga_duration_seconds")
                    .record(saga_start.elapsed().as_secs_f64());
                tracing::warn!(%saga_id, error = %e, "order placement failed");
                return Err(e.into());
            }
        };

        // From here on the order exists. A saga write that fails before the
        // quotation is marked must not leave it live.
        let recorded = self
            .record(
                saga_id,
                &mut saga,
                &mut version,
                SagaEvent::order_placed(STEP_PLACE_ORDER, order_id, order_number.clone()),
            )
            .await;
        self.or_abandon(order_id, recorded).await?;

        // Step 2: mark the quotation converted
        tracing::info!(step = STEP_MARK_CONVERTED, "saga step started");
        let recorded = self
            .record(saga_id, &mut saga, &mut version, SagaEvent::step_started(STEP_MARK_CONVERTED))
            .await;
        self.or_abandon(order_id, recorded).await?;

        let marked = self
            .quotations
            .mark_converted(MarkQuotationConverted::new(
                request.quotation_id,
                order_id,
                order_number.clone(),
            ))
            .await;

        if let Err(e) = marked {
            let reason = e.to_string();
            let recorded = self
                .record(
                    saga_id,
                    &mut saga,
                    &mut version,
                    SagaEvent::step_failed(STEP_MARK_CONVERTED, reason.clone()),
                )
                .await;
            let compensated = match recorded {
                Ok(()) => self.compensate(saga_id, &mut saga, &mut version).await,
                Err(record_err) => Err(record_err),
            };
            self.or_abandon(order_id, compensated).await?;
            metrics::histogram!("conversion_saga_duration_seconds")
                .record(saga_start.elapsed().as_secs_f64());
            return Err(SagaError::Compensated {
                saga_id,
                step: STEP_MARK_CONVERTED,
                reason,
            });
        }

        // The quotation now points at the order, so later saga write
        // failures leave both documents as they are.
        self.record(saga_id, &mut saga, &mut version, SagaEvent::step_completed(STEP_MARK_CONVERTED))
            .await?;
        self.record(saga_id, &mut saga, &mut version, SagaEvent::saga_completed())
            .await?;

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("conversion_saga_duration_seconds").record(duration);
        metrics::counter!("conversion_saga_completed_total").increment(1);
        tracing::info!(%saga_id, %order_id, order_number = %order_number, duration, "quotation converted");

        Ok(Converted {
            saga_id,
            order_id,
            order_number,
        })
    }

    /// Undoes completed steps in reverse order, then marks the saga failed.
    ///
    /// A compensation step that fails is recorded and does not stop the rest.
    #[tracing::instrument(skip(self, saga, version))]
    async fn compensate(
        &self,
        saga_id: AggregateId,
        saga: &mut SagaInstance,
        version: &mut Version,
    ) -> Result<(), SagaError> {
        let failed_step = saga.failed_step().unwrap_or("unknown").to_string();
        let reason = saga.failure_reason().unwrap_or("unknown").to_string();

        self.record(saga_id, saga, version, SagaEvent::compensation_started(&failed_step))
            .await?;

        let completed: Vec<String> = saga.completed_steps().to_vec();
        for step in completed.iter().rev() {
            if step != STEP_PLACE_ORDER {
                continue;
            }
            let Some(order_id) = saga.order_id() else {
                continue;
            };
            let cancel = CancelOrder::new(order_id, format!("Quotation conversion failed: {reason}"));
            let event = match self.orders.cancel_order(cancel).await {
                Ok(_) => SagaEvent::compensation_step_completed(step),
                Err(e) => {
                    tracing::error!(%order_id, error = %e, "failed to cancel order during compensation");
                    SagaEvent::compensation_step_failed(step, e.to_string())
                }
            };
            self.record(saga_id, saga, version, event).await?;
        }

        self.record(
            saga_id,
            saga,
            version,
            SagaEvent::saga_failed(format!("Step failed: {failed_step}")),
        )
        .await?;

        metrics::counter!("conversion_saga_compensated_total").increment(1);
        tracing::warn!(
            order_id = ?saga.order_id(),
            step = %failed_step,
            %reason,
            "conversion compensated"
        );

        Ok(())
    }

    /// Passes `result` through, cancelling the placed order first when it is
    /// an error.
    async fn or_abandon<T>(
        &self,
        order_id: AggregateId,
        result: Result<T, SagaError>,
    ) -> Result<T, SagaError> {
        if let Err(e) = &result {
            self.abandon_order(order_id, &e.to_string()).await;
        }
        result
    }

    /// Cancels an order whose saga could not be recorded. An order that is
    /// already cancelled is left alone.
    #[tracing::instrument(skip(self))]
    async fn abandon_order(&self, order_id: AggregateId, reason: &str) {
        let order = match self.orders.get_order(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(%order_id, error = %e, "failed to load order to abandon");
                return;
            }
        };
        if order.status() == FulfillmentStatus::Cancelled {
            return;
        }

        let cancel = CancelOrder::new(order_id, format!("Quotation conversion failed: {reason}"));
        match self.orders.cancel_order(cancel).await {
            Ok(_) => {
                metrics::counter!("conversion_saga_abandoned_orders_total").increment(1);
                tracing::warn!(%order_id, %reason, "order cancelled after saga write failure");
            }
            Err(e) => {
                tracing::error!(%order_id, error = %e, "failed to cancel abandoned order");
            }
        }
    }

    /// Loads a saga instance by ID from the event store.
    pub async fn get_saga(&self, saga_id: AggregateId) -> Result<Option<SagaInstance>, SagaError> {
        let events = self.store.get_events_for_aggregate(saga_id).await?;

        if events.is_empty() {
            return Ok(None);
        }

        let mut saga = SagaInstance::default();
        for envelope in events {
            let event: SagaEvent = envelope.decode()?;
            saga.apply(event);
            saga.set_version(envelope.version);
        }
        Ok(Some(saga))
    }

    /// Appends one saga event and applies it to the in-flight instance.
    async fn record(
        &self,
        saga_id: AggregateId,
        saga: &mut SagaInstance,
        version: &mut Version,
        event: SagaEvent,
    ) -> Result<(), SagaError> {
        let next_version = version.next();

        let envelope = EventEnvelope::builder()
            .event_type(event.event_type())
            .aggregate_id(saga_id)
            .aggregate_type(SagaInstance::aggregate_type())
            .version(next_version)
            .payload(&event)?
            .build()?;

        *version = self
            .store
            .append(vec![envelope], AppendOptions::expect_version(*version))
            .await?;
        saga.apply(event);
        saga.set_version(*version);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SagaState;
    use common::Localized;
    use domain::{
        ApproveQuotation, ContactForm, Money, NewLineItem, ProductId,
        QuotationStatus, RequestQuotation, VariantId,
    };
    use event_store::{InMemoryEventStore, InMemoryNumberSequence};

    struct Setup {
        coordinator: ConversionCoordinator<InMemoryEventStore>,
        quotations: QuotationService<InMemoryEventStore>,
        orders: OrderService<InMemoryEventStore>,
    }

    fn setup() -> Setup {
        let store = InMemoryEventStore::new();
        let numbers: Arc<dyn NumberSequence> = Arc::new(InMemoryNumberSequence::new());
        Setup {
            coordinator: ConversionCoordinator::new(store.clone(), numbers.clone()),
            quotations: QuotationService::new(store.clone(), numbers.clone()),
            orders: OrderService::new(store, numbers),
        }
    }

    async fn approved_quotation(s: &Setup, unit_rupees: i64, quantity: u32) -> AggregateId {
        let contact = ContactForm {
            name: "Ravi".to_string(),
            mobile: "9812345678".to_string(),
            email: None,
            address: Some("4 Sadar Bazaar, Jodhpur".to_string()),
        };
        let line = NewLineItem {
            product_id: ProductId::new(),
            variant_id: VariantId::new(),
            product_name: Localized::new("Aloo Bhujia", "आलू भुजिया"),
            variant_label: Localized::new("1kg", "1 किलो"),
            quantity,
            unit_price: Some(Money::from_rupees(unit_rupees)),
        };
        let cmd = RequestQuotation::new(contact, vec![line]);
        let quotation_id = cmd.quotation_id;
        s.quotations.submit_quotation(cmd).await.unwrap();
        s.quotations
            .approve_quotation(ApproveQuotation::new(
                quotation_id,
                Money::from_rupees(unit_rupees * i64::from(quantity)),
            ))
            .await
            .unwrap();
        quotation_id
    }

    #[tokio::test]
    async fn converts_approved_quotation() {
        let s = setup();
        let quotation_id = approved_quotation(&s, 250, 2).await;

        let converted = s
            .coordinator
            .convert(ConversionRequest::new(quotation_id, Money::from_rupees(25)))
            .await
            .unwrap();

        assert!(converted.order_number.as_str().starts_with("ORD-"));

        let order = s.orders.get_order(converted.order_id).await.unwrap().unwrap();
        assert_eq!(order.status(), FulfillmentStatus::Processing);
        assert_eq!(order.final_amount(), Money::from_rupees(525));
        assert_eq!(order.quotation().map(|l| l.quotation_id), Some(quotation_id));

        let quotation = s.quotations.get_quotation(quotation_id).await.unwrap().unwrap();
        assert_eq!(quotation.status(), QuotationStatus::ConvertedToOrder);
        assert_eq!(quotation.order().map(|(id, _)| *id), Some(converted.order_id));
    }

    #[tokio::test]
    async fn saga_is_recoverable_from_events() {
        let s = setup();
        let quotation_id = approved_quotation(&s, 100, 1).await;

        let converted = s
            .coordinator
            .convert(ConversionRequest::new(quotation_id, Money::zero()))
            .await
            .unwrap();

        let saga = s.coordinator.get_saga(converted.saga_id).await.unwrap().unwrap();
        assert_eq!(saga.state(), SagaState::Completed);
        assert_eq!(saga.quotation_id(), Some(quotation_id));
        assert_eq!(saga.order_id(), Some(converted.order_id));
        assert_eq!(saga.completed_steps(), &[STEP_PLACE_ORDER, STEP_MARK_CONVERTED]);
        // started, 2 x (step started, step completed), completed
        assert_eq!(saga.version().as_i64(), 6);
    }

    #[tokio::test]
    async fn second_conversion_is_refused_without_side_effects() {
        let s = setup();
        let quotation_id = approved_quotation(&s, 100, 1).await;
        let request = ConversionRequest::new(quotation_id, Money::zero());

        s.coordinator.convert(request.clone()).await.unwrap();
        let err = s.coordinator.convert(request).await.unwrap_err();

        assert!(matches!(
            err,
            SagaError::QuotationNotApproved(QuotationStatus::ConvertedToOrder)
        ));
    }

    #[tokio::test]
    async fn unknown_quotation_is_not_found() {
        let s = setup();
        let missing = AggregateId::new();

        let err = s
            .coordinator
            .convert(ConversionRequest::new(missing, Money::zero()))
            .await
            .unwrap_err();

        assert!(matches!(err, SagaError::QuotationNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn nonexistent_saga_is_none() {
        let s = setup();
        assert!(s.coordinator.get_saga(AggregateId::new()).await.unwrap().is_none());
    }
}

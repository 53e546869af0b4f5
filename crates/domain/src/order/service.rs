//! Order service: numbering, fulfillment and payment commands.

use std::sync::Arc;

use chrono::Utc;
use common::AggregateId;
use event_store::{EventStore, NumberSequence};

use crate::command::{CommandHandler, CommandResult};
use crate::error::DomainError;
use crate::numbering::{DocumentKind, next_document_number};

use super::{
    CancelOrder, DeliverOrder, DispatchOrder, Order, OrderError, PlaceOrder, RecordPayment,
    RefundPayment,
};

impl From<OrderError> for DomainError {
    fn from(e: OrderError) -> Self {
        DomainError::Order(e)
    }
}

/// Entry point for every order operation.
pub struct OrderService<S: EventStore> {
    handler: CommandHandler<S, Order>,
    numbers: Arc<dyn NumberSequence>,
}

impl<S: EventStore> OrderService<S> {
    pub fn new(store: S, numbers: Arc<dyn NumberSequence>) -> Self {
        Self {
            handler: CommandHandler::new(store),
            numbers,
        }
    }

    pub fn handler(&self) -> &CommandHandler<S, Order> {
        &self.handler
    }

    /// Places a new order under the next `ORD-` number.
    ///
    /// Amount and address checks run before a number is drawn.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<CommandResult<Order>, DomainError> {
        cmd.validate()?;

        let number =
            next_document_number(self.numbers.as_ref(), DocumentKind::Order, Utc::now().date_naive())
                .await?;

        let result = self
            .handler
            .execute(cmd.order_id, |o| o.place(number, cmd))
            .await?;

        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(
            number = %result.aggregate.number().map(|n| n.as_str()).unwrap_or_default(),
            final_amount = %result.aggregate.final_amount(),
            "order placed"
        );

        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    pub async fn dispatch_order(
        &self,
        cmd: DispatchOrder,
    ) -> Result<CommandResult<Order>, DomainError> {
        let result = self
            .handler
            .execute(cmd.order_id, |o| o.dispatch(cmd.tracking_number))
            .await?;

        metrics::counter!("orders_dispatched_total").increment(1);
        if result.aggregate.dispatched_unpaid() {
            tracing::warn!("order dispatched while payment is still pending");
        } else {
            tracing::info!("order dispatched");
        }

        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    pub async fn deliver_order(
        &self,
        cmd: DeliverOrder,
    ) -> Result<CommandResult<Order>, DomainError> {
        let result = self.handler.execute(cmd.order_id, |o| o.deliver()).await?;

        tracing::info!("order delivered");
        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, cmd: CancelOrder) -> Result<CommandResult<Order>, DomainError> {
        let result = self
            .handler
            .execute(cmd.order_id, |o| o.cancel(cmd.reason))
            .await?;

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!("order cancelled");
        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    pub async fn record_payment(
        &self,
        cmd: RecordPayment,
    ) -> Result<CommandResult<Order>, DomainError> {
        let result = self
            .handler
            .execute(cmd.order_id, |o| o.record_payment(cmd.reference))
            .await?;

        tracing::info!("payment recorded");
        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    pub async fn refund_payment(
        &self,
        cmd: RefundPayment,
    ) -> Result<CommandResult<Order>, DomainError> {
        let result = self
            .handler
            .execute(cmd.order_id, |o| o.refund_payment(cmd.reason))
            .await?;

        tracing::info!("payment refunded");
        Ok(result)
    }

    /// Loads an order, or `None` if it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: AggregateId) -> Result<Option<Order>, DomainError> {
        self.handler.load_existing(order_id).await
    }
}

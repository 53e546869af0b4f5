//! Domain layer for the storefront.
//!
//! This crate provides:
//! - Aggregate trait and CommandHandler for event-sourced entities
//! - Quotation aggregate with its request/approve/reject/convert state machine
//! - Order aggregate with fulfillment and payment state machines
//! - Customer contact validation with bilingual field errors
//! - Money, document numbers, status badges and catalog types

pub mod aggregate;
pub mod badge;
pub mod catalog;
pub mod command;
pub mod contact;
pub mod error;
pub mod money;
pub mod numbering;
pub mod order;
pub mod quotation;

pub use aggregate::{Aggregate, DomainEvent};
pub use badge::{BadgeIcon, BadgeTone, StatusBadge};
pub use catalog::{
    Catalog, CatalogError, Category, InMemoryCatalog, Product, ProductId, ProductVariant, VariantId,
};
pub use command::{Command, CommandHandler, CommandResult};
pub use contact::{
    ContactForm, CustomerContact, Email, Field, FieldError, MobileNumber, ValidationErrors,
};
pub use error::DomainError;
pub use money::Money;
pub use numbering::{DocumentKind, DocumentNumber, next_document_number};
pub use order::{
    CancelOrder, DeliverOrder, DispatchOrder, FulfillmentStatus, Order, OrderError, OrderEvent,
    OrderLine, OrderService, PaymentStatus, PlaceOrder, QuotationLink, RecordPayment,
    RefundPayment,
};
pub use quotation::{
    ApproveQuotation, LineItem, MAX_LINE_QUANTITY, MarkQuotationConverted, NewLineItem, Quotation,
    QuotationError, QuotationEvent, QuotationService, QuotationStatus, RejectQuotation,
    RequestQuotation,
};

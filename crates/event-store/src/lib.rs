//! Persistence for the storefront: an append-only event store with optimistic
//! concurrency, plus the per-day counters used to mint quotation and order
//! numbers.
//!
//! Both concerns come in two flavours: an in-memory implementation used by
//! tests and the default binary, and a PostgreSQL implementation selected when
//! a database URL is configured.

pub mod error;
pub mod event;
pub mod memory;
pub mod postgres;
pub mod sequence;
pub mod store;

pub use common::AggregateId;
pub use error::{EventStoreError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId, Version};
pub use memory::InMemoryEventStore;
pub use postgres::PostgresEventStore;
pub use sequence::{InMemoryNumberSequence, NumberSequence, PostgresNumberSequence};
pub use store::{AppendOptions, EventStore, EventStoreExt, EventStream};

//! Counters behind the human-readable document numbers.
//!
//! A scope is an opaque key such as `QT-20250101`; each call to
//! [`NumberSequence::next_value`] returns the next integer for that scope,
//! starting at 1. Two concurrent callers never receive the same value.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::{EventStoreError, Result};

/// Source of per-scope monotonically increasing numbers.
#[async_trait]
pub trait NumberSequence: Send + Sync {
    async fn next_value(&self, scope: &str) -> Result<u32>;
}

#[async_trait]
impl<T: NumberSequence + ?Sized> NumberSequence for Arc<T> {
    async fn next_value(&self, scope: &str) -> Result<u32> {
        (**self).next_value(scope).await
    }
}

/// Process-local sequence guarded by a mutex.
#[derive(Clone, Default)]
pub struct InMemoryNumberSequence {
    counters: Arc<Mutex<HashMap<String, u32>>>,
}

impl InMemoryNumberSequence {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NumberSequence for InMemoryNumberSequence {
    async fn next_value(&self, scope: &str) -> Result<u32> {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry(scope.to_string()).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| EventStoreError::SequenceExhausted(scope.to_string()))?;
        Ok(*counter)
    }
}

/// Sequence stored in the `document_sequences` table.
///
/// The upsert takes a row lock, so concurrent transactions on the same scope
/// serialize and each sees a distinct value.
#[derive(Clone)]
pub struct PostgresNumberSequence {
    pool: PgPool,
}

impl PostgresNumberSequence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NumberSequence for PostgresNumberSequence {
    async fn next_value(&self, scope: &str) -> Result<u32> {
        let value: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO document_sequences (scope, last_value)
            VALUES ($1, 1)
            ON CONFLICT (scope) DO UPDATE SET
                last_value = document_sequences.last_value + 1,
                updated_at = NOW()
            RETURNING last_value
            "#,
        )
        .bind(scope)
        .fetch_one(&self.pool)
        .await?;

        u32::try_from(value).map_err(|_| EventStoreError::SequenceExhausted(scope.to_string()))
    }
}

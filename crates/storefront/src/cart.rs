//! The device-local cart.

use std::sync::Arc;

use common::Localized;
use domain::{Money, NewLineItem, ProductId, VariantId};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};

use crate::storage::KeyValueStorage;

/// Storage key the cart is kept under.
pub const CART_KEY: &str = "lalaji_cart";

const CHANNEL_CAPACITY: usize = 64;

/// One cart line, keyed by (product, variant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: Localized,
    pub variant_label: Localized,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Option<Money>,
    /// Display value only; recomputed whenever quantity changes.
    #[serde(default)]
    pub total_price: Option<Money>,
}

impl CartItem {
    pub fn new(
        product_id: ProductId,
        variant_id: VariantId,
        product_name: Localized,
        variant_label: Localized,
        quantity: u32,
        unit_price: Option<Money>,
    ) -> Self {
        let mut item = Self {
            product_id,
            variant_id,
            product_name,
            variant_label,
            quantity,
            unit_price,
            total_price: None,
        };
        item.reprice();
        item
    }

    fn matches(&self, product_id: ProductId, variant_id: VariantId) -> bool {
        self.product_id == product_id && self.variant_id == variant_id
    }

    fn reprice(&mut self) {
        self.total_price = self.unit_price.map(|p| p.multiply(self.quantity));
    }
}

impl From<CartItem> for NewLineItem {
    fn from(item: CartItem) -> Self {
        NewLineItem {
            product_id: item.product_id,
            variant_id: item.variant_id,
            product_name: item.product_name,
            variant_label: item.variant_label,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// What happened to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    Added,
    QuantityUpdated,
    Removed,
    Cleared,
}

/// Broadcast after every cart write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartChanged {
    pub change: CartChange,
    /// Sum of quantities after the change.
    pub count: u32,
}

/// Cart kept in device-local storage.
///
/// Reads go through storage every time. A read failure or unreadable
/// payload yields an empty cart and a write failure is logged and dropped,
/// so callers never see storage errors. Listeners registered with
/// [`subscribe`](Self::subscribe) are notified once the write has been
/// attempted.
pub struct CartStore {
    storage: Arc<dyn KeyValueStorage>,
    events: broadcast::Sender<CartChanged>,
    write_lock: Mutex<()>,
}

impl CartStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            storage,
            events,
            write_lock: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.events.subscribe()
    }

    /// Current cart lines in insertion order.
    pub async fn items(&self) -> Vec<CartItem> {
        let raw = match self.storage.get(CART_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read cart, treating as empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unreadable cart payload, treating as empty");
            Vec::new()
        })
    }

    /// Adds `item`, merging into an existing (product, variant) line.
    ///
    /// A zero quantity leaves the cart untouched.
    #[tracing::instrument(skip(self, item), fields(product_id = %item.product_id, quantity = item.quantity))]
    pub async fn add(&self, item: CartItem) -> Vec<CartItem> {
        let _guard = self.write_lock.lock().await;
        let mut cart = self.items().await;
        if item.quantity == 0 {
            return cart;
        }

        match cart
            .iter_mut()
            .find(|i| i.matches(item.product_id, item.variant_id))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                existing.reprice();
            }
            None => {
                let mut item = item;
                item.reprice();
                cart.push(item);
            }
        }

        self.save(&cart, CartChange::Added).await;
        cart
    }

    /// Sets a line's quantity. Zero or less removes the line; a missing line
    /// leaves the cart unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        product_id: ProductId,
        variant_id: VariantId,
        quantity: i64,
    ) -> Vec<CartItem> {
        let _guard = self.write_lock.lock().await;
        let mut cart = self.items().await;
        let Some(index) = cart.iter().position(|i| i.matches(product_id, variant_id)) else {
            return cart;
        };

        if quantity <= 0 {
            cart.remove(index);
        } else {
            let line = &mut cart[index];
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            line.reprice();
        }

        self.save(&cart, CartChange::QuantityUpdated).await;
        cart
    }

    /// Removes a line. Removing a missing line is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, product_id: ProductId, variant_id: VariantId) -> Vec<CartItem> {
        let _guard = self.write_lock.lock().await;
        let mut cart = self.items().await;
        let before = cart.len();
        cart.retain(|i| !i.matches(product_id, variant_id));
        if cart.len() != before {
            self.save(&cart, CartChange::Removed).await;
        }
        cart
    }

    #[tracing::instrument(skip(self))]
    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.storage.remove(CART_KEY).await {
            tracing::warn!(error = %e, "failed to clear cart");
        }
        self.notify(CartChange::Cleared, 0);
    }

    /// Sum of quantities, saturating at `u32::MAX`.
    pub async fn count(&self) -> u32 {
        count(&self.items().await)
    }

    /// Sum of line totals when every line is priced, else `None`.
    pub async fn estimated_total(&self) -> Option<Money> {
        let cart = self.items().await;
        if cart.is_empty() {
            return None;
        }
        cart.iter().map(|i| i.total_price).sum()
    }

    async fn save(&self, cart: &[CartItem], change: CartChange) {
        let written = match serde_json::to_string(cart) {
            Ok(raw) => self.storage.set(CART_KEY, raw).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(error) = written {
            tracing::warn!(%error, "failed to save cart");
        }
        self.notify(change, count(cart));
    }

    fn notify(&self, change: CartChange, count: u32) {
        // No receivers is fine.
        let _ = self.events.send(CartChanged { change, count });
    }
}

fn count(cart: &[CartItem]) -> u32 {
    cart.iter().map(|i| i.quantity).fold(0, u32::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingStorage, InMemoryStorage};

    fn bhujia(quantity: u32) -> CartItem {
        CartItem::new(
            ProductId::from_uuid(uuid_for(1)),
            VariantId::from_uuid(uuid_for(2)),
            Localized::new("Bhujia", "भुजिया"),
            Localized::new("500g", "500 ग्राम"),
            quantity,
            Some(Money::from_rupees(120)),
        )
    }

    fn mixture(quantity: u32) -> CartItem {
        CartItem::new(
            ProductId::from_uuid(uuid_for(3)),
            VariantId::from_uuid(uuid_for(4)),
            Localized::new("Navratan Mixture", "नवरतन मिक्सचर"),
            Localized::new("1kg", "1 किलो"),
            quantity,
            None,
        )
    }

    fn uuid_for(n: u128) -> uuid::Uuid {
        uuid::Uuid::from_u128(n)
    }

    fn store() -> CartStore {
        CartStore::new(Arc::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn add_merges_same_product_and_variant() {
        let cart = store();
        cart.add(bhujia(2)).await;
        let items = cart.add(bhujia(3)).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
        assert_eq!(items[0].total_price, Some(Money::from_rupees(600)));
        assert_eq!(cart.count().await, 5);
    }

    #[tokio::test]
    async fn different_variants_are_separate_lines() {
        let cart = store();
        cart.add(bhujia(1)).await;
        let mut other = bhujia(1);
        other.variant_id = VariantId::from_uuid(uuid_for(9));
        let items = cart.add(other).await;

        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn client_total_is_recomputed() {
        let cart = store();
        let mut item = bhujia(2);
        item.total_price = Some(Money::from_rupees(1));

        let items = cart.add(item).await;
        assert_eq!(items[0].total_price, Some(Money::from_rupees(240)));
    }

    #[tokio::test]
    async fn update_to_zero_removes_and_missing_is_noop() {
        let cart = store();
        let b = bhujia(2);
        cart.add(b.clone()).await;
        cart.add(mixture(1)).await;

        let items = cart.update_quantity(b.product_id, b.variant_id, 7).await;
        assert_eq!(items[0].quantity, 7);
        assert_eq!(items[0].total_price, Some(Money::from_rupees(840)));

        let items = cart.update_quantity(b.product_id, b.variant_id, 0).await;
        assert_eq!(items.len(), 1);

        let before = cart.items().await;
        let after = cart
            .update_quantity(ProductId::new(), VariantId::new(), 4)
            .await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn negative_quantity_removes() {
        let cart = store();
        let b = bhujia(2);
        cart.add(b.clone()).await;

        assert!(cart.update_quantity(b.product_id, b.variant_id, -3).await.is_empty());
    }

    #[tokio::test]
    async fn huge_quantities_saturate_the_badge_count() {
        let cart = store();
        let (b, m) = (bhujia(1), mixture(1));
        cart.add(b.clone()).await;
        cart.add(m.clone()).await;

        cart.update_quantity(b.product_id, b.variant_id, 3_000_000_000).await;
        cart.update_quantity(m.product_id, m.variant_id, 3_000_000_000).await;

        assert_eq!(cart.count().await, u32::MAX);
        let items = cart.items().await;
        assert!(items.iter().all(|i| i.quantity == 3_000_000_000));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let cart = store();
        let b = bhujia(1);
        cart.add(b.clone()).await;

        assert!(cart.remove(b.product_id, b.variant_id).await.is_empty());
        assert!(cart.remove(b.product_id, b.variant_id).await.is_empty());
    }

    #[tokio::test]
    async fn zero_quantity_add_is_ignored() {
        let cart = store();
        assert!(cart.add(bhujia(0)).await.is_empty());
    }

    #[tokio::test]
    async fn estimate_requires_every_line_priced() {
        let cart = store();
        assert_eq!(cart.estimated_total().await, None);

        cart.add(bhujia(2)).await;
        assert_eq!(cart.estimated_total().await, Some(Money::from_rupees(240)));

        cart.add(mixture(1)).await;
        assert_eq!(cart.estimated_total().await, None);
    }

    #[tokio::test]
    async fn listeners_see_each_change_after_write() {
        let cart = store();
        let mut first = cart.subscribe();
        let mut second = cart.subscribe();

        cart.add(bhujia(2)).await;
        cart.clear().await;

        for rx in [&mut first, &mut second] {
            assert_eq!(
                rx.recv().await.unwrap(),
                CartChanged {
                    change: CartChange::Added,
                    count: 2
                }
            );
            assert_eq!(rx.recv().await.unwrap().change, CartChange::Cleared);
        }
        assert_eq!(cart.count().await, 0);
    }

    #[tokio::test]
    async fn failing_storage_degrades_silently() {
        let cart = CartStore::new(Arc::new(FailingStorage));
        let mut rx = cart.subscribe();

        let items = cart.add(bhujia(2)).await;
        assert_eq!(items.len(), 1);
        assert_eq!(rx.recv().await.unwrap().count, 2);

        assert!(cart.items().await.is_empty());
        assert_eq!(cart.count().await, 0);
        cart.clear().await;
    }

    #[tokio::test]
    async fn unreadable_payload_reads_as_empty() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.set(CART_KEY, "not json".to_string()).await.unwrap();

        let cart = CartStore::new(storage);
        assert!(cart.items().await.is_empty());
        assert_eq!(cart.add(bhujia(1)).await.len(), 1);
    }

    #[tokio::test]
    async fn no_duplicate_pairs_after_mixed_operations() {
        let cart = store();
        let b = bhujia(1);
        let m = mixture(1);
        cart.add(b.clone()).await;
        cart.add(m.clone()).await;
        cart.add(b.clone()).await;
        cart.update_quantity(m.product_id, m.variant_id, 0).await;
        cart.add(m.clone()).await;
        cart.add(m.clone()).await;
        cart.remove(b.product_id, b.variant_id).await;
        cart.add(b.clone()).await;

        let items = cart.items().await;
        let mut keys: Vec<_> = items.iter().map(|i| (i.product_id, i.variant_id)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), items.len());
        assert_eq!(cart.count().await, 3);
    }
}

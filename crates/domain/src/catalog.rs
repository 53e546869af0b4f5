//! Product catalog read model.
//!
//! Staff maintain the catalog elsewhere; this side only answers storefront
//! queries. Every customer-facing query hides inactive categories, products
//! and variants.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::Localized;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(Uuid);

impl VariantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for VariantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: Localized,
    pub slug: String,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A purchasable pack size of a product, e.g. "500g".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub weight_grams: u32,
    pub weight_label: Localized,
    /// Unset when the price is quoted on request.
    pub price: Option<Money>,
    pub is_active: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: Uuid,
    pub name: Localized,
    pub slug: String,
    pub description: Option<Localized>,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub display_order: i32,
    pub variants: Vec<ProductVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Copy with inactive variants removed and the rest in display order.
    fn storefront_view(&self) -> Product {
        let mut product = self.clone();
        product.variants.retain(|v| v.is_active);
        product.variants.sort_by_key(|v| v.display_order);
        product
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Storefront and admin queries over the catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Active categories by display order.
    async fn active_categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// Active products by display order, optionally limited to one category slug.
    /// An unknown slug yields an empty list.
    async fn active_products(&self, category_slug: Option<&str>)
    -> Result<Vec<Product>, CatalogError>;

    /// Active products flagged as featured, by display order.
    async fn featured_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Most recently created active products first.
    async fn newest_products(&self, limit: usize) -> Result<Vec<Product>, CatalogError>;

    /// An active product by slug.
    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, CatalogError>;

    /// Every product, active or not, for the admin listing.
    async fn all_products(&self) -> Result<Vec<Product>, CatalogError>;

    async fn product_count(&self) -> Result<usize, CatalogError>;
}

/// Catalog held in memory.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    categories: Arc<RwLock<Vec<Category>>>,
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_category(&self, category: Category) {
        self.categories.write().await.push(category);
    }

    pub async fn insert_product(&self, product: Product) {
        self.products.write().await.push(product);
    }

    async fn active_where(&self, keep: impl Fn(&Product) -> bool) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.is_active && keep(*p))
            .map(Product::storefront_view)
            .collect();
        products.sort_by_key(|p| p.display_order);
        products
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn active_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let mut categories: Vec<Category> = self
            .categories
            .read()
            .await
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.display_order);
        Ok(categories)
    }

    async fn active_products(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<Product>, CatalogError> {
        let Some(slug) = category_slug else {
            return Ok(self.active_where(|_| true).await);
        };

        let category_id = self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.slug == slug)
            .map(|c| c.id);

        match category_id {
            Some(id) => Ok(self.active_where(|p| p.category_id == id).await),
            None => Ok(Vec::new()),
        }
    }

    async fn featured_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.active_where(|p| p.is_featured).await)
    }

    async fn newest_products(&self, limit: usize) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.active_where(|_| true).await;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products.truncate(limit);
        Ok(products)
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.active_where(|p| p.slug == slug).await.into_iter().next())
    }

    async fn all_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.products.read().await.clone();
        products.sort_by_key(|p| p.display_order);
        Ok(products)
    }

    async fn product_count(&self) -> Result<usize, CatalogError> {
        Ok(self.products.read().await.len())
    }
}

//! Demo catalog served when no external catalog is configured.

use chrono::Utc;
use common::Localized;
use domain::{Category, InMemoryCatalog, Money, Product, ProductId, ProductVariant, VariantId};
use uuid::Uuid;

struct Pack {
    grams: u32,
    en: &'static str,
    hi: &'static str,
    price: Option<i64>,
}

const fn pack(grams: u32, en: &'static str, hi: &'static str, price: Option<i64>) -> Pack {
    Pack { grams, en, hi, price }
}

/// Builds a small namkeen catalog: four categories, six products, one of
/// them inactive.
pub async fn demo_catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();

    let bhujia = category(&catalog, "bhujia", "Bhujia", "भुजिया", 1).await;
    let mixture = category(&catalog, "mixture", "Mixture", "मिक्सचर", 2).await;
    let sweets = category(&catalog, "sweets", "Sweets", "मिठाई", 3).await;
    let papad = category(&catalog, "papad", "Papad", "पापड़", 4).await;

    let standard = [
        pack(250, "250g", "250 ग्राम", Some(80)),
        pack(500, "500g", "500 ग्राम", Some(150)),
        pack(1000, "1kg", "1 किलो", Some(280)),
    ];

    product(
        &catalog,
        bhujia,
        ("bikaneri-bhujia", "Bikaneri Bhujia", "बीकानेरी भुजिया"),
        true,
        1,
        &standard,
    )
    .await;
    product(
        &catalog,
        bhujia,
        ("aloo-bhujia", "Aloo Bhujia", "आलू भुजिया"),
        false,
        2,
        &[
            pack(200, "200g", "200 ग्राम", Some(60)),
            pack(400, "400g", "400 ग्राम", Some(110)),
        ],
    )
    .await;
    product(
        &catalog,
        mixture,
        ("navratan-mixture", "Navratan Mixture", "नवरत्न मिक्सचर"),
        true,
        3,
        &standard,
    )
    .await;
    product(
        &catalog,
        sweets,
        ("soan-papdi", "Soan Papdi", "सोन पापड़ी"),
        false,
        4,
        &[
            pack(500, "500g", "500 ग्राम", Some(180)),
            pack(5000, "5kg (bulk)", "5 किलो (थोक)", None),
        ],
    )
    .await;
    product(
        &catalog,
        papad,
        ("moong-papad", "Moong Papad", "मूंग पापड़"),
        false,
        5,
        &[pack(250, "250g", "250 ग्राम", Some(90))],
    )
    .await;

    let mut gajak = build_product(
        sweets,
        ("til-gajak", "Til Gajak", "तिल गजक"),
        false,
        6,
        &[pack(500, "500g", "500 ग्राम", Some(200))],
    );
    gajak.is_active = false;
    catalog.insert_product(gajak).await;

    catalog
}

async fn category(
    catalog: &InMemoryCatalog,
    slug: &str,
    en: &str,
    hi: &str,
    display_order: i32,
) -> Uuid {
    let id = Uuid::new_v4();
    catalog
        .insert_category(Category {
            id,
            name: Localized::new(en, hi),
            slug: slug.to_string(),
            image_url: None,
            display_order,
            is_active: true,
            created_at: Utc::now(),
        })
        .await;
    id
}

async fn product(
    catalog: &InMemoryCatalog,
    category_id: Uuid,
    names: (&str, &str, &str),
    is_featured: bool,
    display_order: i32,
    packs: &[Pack],
) {
    catalog
        .insert_product(build_product(category_id, names, is_featured, display_order, packs))
        .await;
}

fn build_product(
    category_id: Uuid,
    (slug, en, hi): (&str, &str, &str),
    is_featured: bool,
    display_order: i32,
    packs: &[Pack],
) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(),
        category_id,
        name: Localized::new(en, hi),
        slug: slug.to_string(),
        description: None,
        image_url: None,
        is_featured,
        is_active: true,
        display_order,
        variants: packs
            .iter()
            .zip(1..)
            .map(|(p, order)| ProductVariant {
                id: VariantId::new(),
                weight_grams: p.grams,
                weight_label: Localized::new(p.en, p.hi),
                price: p.price.map(Money::from_rupees),
                is_active: true,
                display_order: order,
            })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

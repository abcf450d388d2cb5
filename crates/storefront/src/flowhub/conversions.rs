//! Conversions from Flowhub wire types to domain types.

use terp_haus_core::{
    CustomerInfo, Order, OrderLine, OrderStatus, Product, ProductCategory, ProductImage,
    TerpeneProfile,
};

use super::types::{FlowhubOrder, FlowhubProduct};

/// Map a Flowhub product onto the menu [`Product`].
///
/// Image alt text falls back to the product name. Flowhub has no notion of
/// a primary image, effects or consumption methods, so those stay empty.
#[must_use]
pub fn convert_product(product: FlowhubProduct) -> Product {
    let FlowhubProduct {
        id,
        name,
        description,
        category,
        subcategory,
        price,
        unit,
        thc,
        cbd,
        terpenes,
        images,
        in_stock,
        stock_quantity,
        created_at,
        updated_at,
    } = product;

    let images = images
        .unwrap_or_default()
        .into_iter()
        .map(|image| ProductImage {
            id: image.id,
            url: image.url,
            alt: image
                .alt
                .filter(|alt| !alt.is_empty())
                .unwrap_or_else(|| name.clone()),
            is_primary: false,
        })
        .collect();

    Product {
        id,
        description: description.unwrap_or_default(),
        category: ProductCategory::from(category),
        subcategory,
        price,
        unit,
        thc,
        cbd,
        terpenes: terpenes.map(TerpeneProfile::from).unwrap_or_default(),
        images,
        in_stock,
        stock_quantity,
        effects: Vec::new(),
        consumption_methods: Vec::new(),
        created_at,
        updated_at,
        name,
    }
}

/// Map a Flowhub order onto [`Order`].
///
/// Lines are left unhydrated (`product: None`). Flowhub only accepts orders
/// that passed the age gate, so the customer is marked verified.
#[must_use]
pub fn convert_order(order: FlowhubOrder) -> Order {
    Order {
        id: order.id,
        order_number: order.order_number,
        items: order
            .items
            .into_iter()
            .map(|item| OrderLine {
                product_id: item.product_id,
                product: None,
                quantity: item.quantity,
                price: item.price,
            })
            .collect(),
        customer: CustomerInfo {
            first_name: order.customer.first_name,
            last_name: order.customer.last_name,
            email: order.customer.email,
            phone: order.customer.phone,
            date_of_birth: order.customer.date_of_birth,
            is_age_verified: true,
        },
        status: OrderStatus::from(order.status),
        total: order.total,
        tax: order.tax,
        pickup_time: order.pickup_time,
        notes: order.notes,
        created_at: order.created_at,
        updated_at: order.updated_at,
    }
}

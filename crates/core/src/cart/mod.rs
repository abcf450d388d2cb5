//! Shopping cart state.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s with two derived
//! aggregates, `total` and `item_count`. The aggregates are recomputed from
//! the full item list after every mutation, so they can never drift from the
//! lines they summarize.
//!
//! Invariants:
//! - at most one line per product ID (re-adding a product bumps its quantity)
//! - every line has a quantity of at least 1
//! - a line keeps the unit price captured when it was first added, even if
//!   the catalog price changes later
//!
//! [`Cart`] itself is pure in-memory state. [`CartStore`] wraps it with a
//! [`CartStorage`] backend and persists a versioned [`CartSnapshot`] after
//! every mutation.

mod snapshot;
mod store;

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

pub use snapshot::{CART_STORAGE_KEY, CartSnapshot, CartState, CartStateError, SNAPSHOT_VERSION};
pub use store::{CartStorage, CartStore, CartStoreError, MemoryCartStorage};

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    /// Product as it looked when it was added.
    pub product: Product,
    pub quantity: u32,
    /// Unit price locked at add time.
    pub price: Price,
}

impl CartItem {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.line_total(self.quantity)
    }
}

/// The shopping cart.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
    item_count: u32,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored lines.
    ///
    /// Lines with a zero quantity are dropped and duplicate product IDs are
    /// merged into the first occurrence (keeping its locked price), so the
    /// result always satisfies the cart invariants.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(&item.product_id) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart.recompute();
        cart
    }

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is increased and
    /// the originally captured price is kept. Otherwise a new line is
    /// appended at the product's current price.
    pub fn add_item(&mut self, product: Product, quantity: NonZeroU32) {
        match self.items.iter_mut().find(|item| item.product_id == product.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity.get());
            }
            None => self.items.push(CartItem {
                product_id: product.id.clone(),
                price: product.price,
                product,
                quantity: quantity.get(),
            }),
        }
        self.recompute();
    }

    /// Remove the line for `product_id`.
    ///
    /// Returns `true` if a line was removed. Removing an absent product is
    /// not an error.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        self.recompute();
        self.items.len() != before
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line, exactly like
    /// [`remove_item`](Self::remove_item). Setting the quantity of a product
    /// that is not in the cart does nothing. Returns `true` if a line was
    /// changed or removed.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        let touched = match self.items.iter_mut().find(|item| &item.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        };
        self.recompute();
        touched
    }

    /// Add one unit to an existing line.
    pub fn increment_quantity(&mut self, product_id: &ProductId) -> bool {
        let current = self.item_quantity(product_id);
        self.update_quantity(product_id, current.saturating_add(1))
    }

    /// Take one unit off a line, removing it when it would reach zero.
    pub fn decrement_quantity(&mut self, product_id: &ProductId) -> bool {
        let current = self.item_quantity(product_id);
        if current > 1 {
            self.update_quantity(product_id, current - 1)
        } else {
            self.remove_item(product_id)
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    /// Quantity of `product_id` in the cart, or 0 if absent.
    #[must_use]
    pub fn item_quantity(&self, product_id: &ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.quantity)
    }

    #[must_use]
    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.position(product_id).is_some()
    }

    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub const fn item_count(&self) -> u32 {
        self.item_count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    #[must_use]
    pub const fn has_items(&self) -> bool {
        self.item_count > 0
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.product_id == product_id)
    }

    fn recompute(&mut self) {
        self.total = self
            .items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.line_total()));
        self.item_count = self
            .items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity));
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::product;
    use super::*;

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn assert_aggregates_consistent(cart: &Cart) {
        let total: Decimal = cart
            .items()
            .iter()
            .map(|item| item.price.amount() * Decimal::from(item.quantity))
            .sum();
        let count: u32 = cart.items().iter().map(|item| item.quantity).sum();
        assert_eq!(cart.total(), total);
        assert_eq!(cart.item_count(), count);
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert!(!cart.has_items());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_repeat_add_accumulates_quantity_at_first_price() {
        let mut cart = Cart::new();
        cart.add_item(product("og-kush", 4500), qty(1));
        cart.add_item(product("og-kush", 4500), qty(2));
        cart.add_item(product("og-kush", 4500), qty(4));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 7);
        assert_eq!(cart.total(), Decimal::new(4500, 2) * Decimal::from(7));
    }

    #[test]
    fn test_price_is_locked_at_first_add() {
        let mut cart = Cart::new();
        cart.add_item(product("gelato", 3000), qty(1));
        // Catalog price went up since the first add.
        cart.add_item(product("gelato", 3500), qty(1));

        let line = cart.get(&ProductId::new("gelato")).unwrap();
        assert_eq!(line.price.amount(), Decimal::new(3000, 2));
        assert_eq!(cart.total(), Decimal::new(6000, 2));
    }

    #[test]
    fn test_distinct_products_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1000), qty(1));
        cart.add_item(product("b", 2000), qty(2));
        cart.add_item(product("a", 1000), qty(1));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.total(), Decimal::new(6000, 2));
        assert_aggregates_consistent(&cart);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1000), qty(2));
        cart.add_item(product("b", 500), qty(1));

        assert!(cart.remove_item(&ProductId::new("a")));
        assert!(!cart.is_in_cart(&ProductId::new("a")));
        assert_eq!(cart.item_quantity(&ProductId::new("a")), 0);
        assert_eq!(cart.total(), Decimal::new(500, 2));
        assert_aggregates_consistent(&cart);
    }

    #[test]
    fn test_remove_absent_item_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1000), qty(1));
        let before = cart.clone();

        assert!(!cart.remove_item(&ProductId::new("missing")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_quantity_sets_absolute_value() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1000), qty(5));

        assert!(cart.update_quantity(&ProductId::new("a"), 2));
        assert_eq!(cart.item_quantity(&ProductId::new("a")), 2);
        assert_eq!(cart.total(), Decimal::new(2000, 2));
    }

    #[test]
    fn test_update_quantity_zero_matches_remove() {
        let mut via_update = Cart::new();
        via_update.add_item(product("a", 1000), qty(3));
        via_update.add_item(product("b", 700), qty(1));
        let mut via_remove = via_update.clone();

        via_update.update_quantity(&ProductId::new("a"), 0);
        via_remove.remove_item(&ProductId::new("a"));

        assert_eq!(via_update, via_remove);
        assert!(!via_update.is_in_cart(&ProductId::new("a")));
    }

    #[test]
    fn test_update_quantity_on_absent_product_is_silent_noop() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1000), qty(1));
        let before = cart.clone();

        assert!(!cart.update_quantity(&ProductId::new("missing"), 4));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_removes_last_unit() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1000), qty(1));

        assert!(cart.decrement_quantity(&ProductId::new("a")));
        assert!(!cart.is_in_cart(&ProductId::new("a")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_subtracts_exactly_one() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1000), qty(3));

        cart.decrement_quantity(&ProductId::new("a"));
        assert_eq!(cart.item_quantity(&ProductId::new("a")), 2);
        assert_aggregates_consistent(&cart);
    }

    #[test]
    fn test_increment_adds_one() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1000), qty(2));

        cart.increment_quantity(&ProductId::new("a"));
        assert_eq!(cart.item_quantity(&ProductId::new("a")), 3);
        assert_eq!(cart.total(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_increment_absent_product_does_not_add_line() {
        let mut cart = Cart::new();
        assert!(!cart.increment_quantity(&ProductId::new("a")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_resets_aggregates() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1000), qty(2));
        cart.add_item(product("b", 2550), qty(1));

        cart.clear();
        assert!(cart.items().is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_aggregates_hold_across_mixed_mutations() {
        let mut cart = Cart::new();
        let ids = ["a", "b", "c", "d"];
        for (step, id) in ids.iter().cycle().take(24).enumerate() {
            let pid = ProductId::new(*id);
            let cents = 1000 + i64::try_from(step % 4).unwrap() * 333;
            match step % 6 {
                0 | 1 => cart.add_item(product(id, cents), qty(u32::try_from(step % 3 + 1).unwrap())),
                2 => {
                    cart.increment_quantity(&pid);
                }
                3 => {
                    cart.decrement_quantity(&pid);
                }
                4 => {
                    cart.update_quantity(&pid, u32::try_from(step % 5).unwrap());
                }
                _ => {
                    cart.remove_item(&pid);
                }
            }
            assert_aggregates_consistent(&cart);
            assert!(cart.items().iter().all(|item| item.quantity >= 1));
        }
    }

    #[test]
    fn test_ceiling_price_at_max_quantity_keeps_exact_total() {
        let mut cart = Cart::new();
        let mut expensive = product("vault", 0);
        expensive.price = Price::MAX;
        cart.add_item(expensive.clone(), qty(u32::MAX));
        cart.add_item(expensive, qty(2));
        cart.add_item(product("b", 100_000_000), qty(u32::MAX));

        assert_eq!(cart.item_quantity(&ProductId::new("vault")), u32::MAX);
        assert_aggregates_consistent(&cart);
    }

    #[test]
    fn test_from_items_merges_duplicates_and_drops_empty_lines() {
        let a = product("a", 1000);
        let items = vec![
            CartItem {
                product_id: a.id.clone(),
                product: a.clone(),
                quantity: 1,
                price: a.price,
            },
            CartItem {
                product_id: ProductId::new("b"),
                product: product("b", 500),
                quantity: 0,
                price: product("b", 500).price,
            },
            CartItem {
                product_id: a.id.clone(),
                product: a.clone(),
                quantity: 2,
                price: Price::new(Decimal::new(9999, 2)).unwrap(),
            },
        ];

        let cart = Cart::from_items(items);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_quantity(&ProductId::new("a")), 3);
        assert_eq!(cart.total(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_cart_serializes_camel_case_with_numeric_total() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 1250), qty(2));

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["itemCount"], 2);
        assert_eq!(json["total"], 25.0);
        assert_eq!(json["items"][0]["productId"], "a");
    }
}

//! Catalog
//!
//! The cart reads products from a catalog but never writes back to it.

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::products::{Product, ProductId};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Read-only product lookup.
pub trait Catalog<'a> {
    /// Look up a product by its id.
    fn product(&self, id: &str) -> Option<&Product<'a>>;
}

/// Catalog held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    keys: FxHashMap<ProductId, ProductKey>,
}

impl<'a> InMemoryCatalog<'a> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            products: SlotMap::with_key(),
            keys: FxHashMap::default(),
        }
    }

    /// Insert a product, replacing any product with the same id.
    pub fn insert(&mut self, product: Product<'a>) -> ProductKey {
        let existing = self
            .keys
            .get(&product.id)
            .copied()
            .filter(|key| self.products.contains_key(*key));

        if let Some(key) = existing {
            if let Some(slot) = self.products.get_mut(key) {
                *slot = product;
            }

            return key;
        }

        let id = product.id.clone();
        let key = self.products.insert(product);
        self.keys.insert(id, key);

        key
    }

    /// Get a product by id.
    pub fn get(&self, id: &str) -> Option<&Product<'a>> {
        self.keys.get(id).and_then(|key| self.products.get(*key))
    }

    /// Remove a product by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Product<'a>> {
        let key = self.keys.remove(id)?;

        self.products.remove(key)
    }

    /// Iterate over all products.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.values()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> FromIterator<Product<'a>> for InMemoryCatalog<'a> {
    fn from_iter<I: IntoIterator<Item = Product<'a>>>(iter: I) -> Self {
        let mut catalog = Self::new();

        for product in iter {
            catalog.insert(product);
        }

        catalog
    }
}

impl<'a> Catalog<'a> for InMemoryCatalog<'a> {
    fn product(&self, id: &str) -> Option<&Product<'a>> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::INR};

    use super::*;

    fn product<'a>(id: &str, major: i64) -> Product<'a> {
        Product::new(id, id.to_uppercase(), Money::from_major(major, INR))
    }

    #[test]
    fn insert_and_get() {
        let catalog: InMemoryCatalog<'_> = [product("a", 10), product("b", 20)]
            .into_iter()
            .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("b").map(|p| p.price),
            Some(Money::from_major(20, INR))
        );
        assert!(catalog.get("c").is_none());
    }

    #[test]
    fn insert_replaces_same_id() {
        let mut catalog = InMemoryCatalog::new();

        let first = catalog.insert(product("a", 10));
        let second = catalog.insert(product("a", 15));

        assert_eq!(first, second, "replacing keeps the slot key");
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.product("a").map(|p| p.price),
            Some(Money::from_major(15, INR))
        );
    }

    #[test]
    fn remove_drops_index_entry() {
        let mut catalog: InMemoryCatalog<'_> = [product("a", 10)].into_iter().collect();

        assert!(catalog.remove("a").is_some());
        assert!(catalog.remove("a").is_none());
        assert!(catalog.is_empty());
    }
}

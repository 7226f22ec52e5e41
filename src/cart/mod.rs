//! Cart
//!
//! The authoritative in-memory cart for one shopping session. Commands never
//! fail: invalid quantities are normalised and unknown product ids are
//! ignored, so the cart always ends up in the state the caller asked for or
//! stays as it was.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    pricing::{bulk_applies, effective_unit_price, line_total, standard_line_total, subtotal},
    products::{Product, ProductId},
    quantity::Quantity,
};

pub mod observer;
pub mod snapshot;

pub use observer::{CartEvent, CartObserver, EventLog, NoopObserver};
pub use snapshot::{CartSnapshot, SnapshotError};

/// One product in the cart and how many units of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    product: Product<'a>,
    quantity: Quantity,
}

impl<'a> CartLine<'a> {
    /// Create a line from a product snapshot.
    pub fn new(product: Product<'a>, quantity: Quantity) -> Self {
        Self { product, quantity }
    }

    /// Product snapshot taken when the line was created.
    pub fn product(&self) -> &Product<'a> {
        &self.product
    }

    /// Product id of the line.
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Number of units.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Unit price after bulk pricing.
    pub fn unit_price(&self) -> Money<'a, Currency> {
        effective_unit_price(&self.product, self.quantity)
    }

    /// Unit price times quantity.
    pub fn total(&self) -> Money<'a, Currency> {
        line_total(&self.product, self.quantity)
    }

    /// Line total if no bulk price applied.
    pub fn standard_total(&self) -> Money<'a, Currency> {
        standard_line_total(&self.product, self.quantity)
    }

    /// Whether the bulk price is in effect for this line.
    pub fn bulk_applied(&self) -> bool {
        bulk_applies(&self.product, self.quantity)
    }
}

/// Read model of a cart line, with prices already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView<'c, 'a> {
    /// Product id
    pub product_id: &'c ProductId,

    /// Product snapshot
    pub product: &'c Product<'a>,

    /// Number of units
    pub quantity: Quantity,

    /// Unit price after bulk pricing
    pub effective_unit_price: Money<'a, Currency>,

    /// `effective_unit_price * quantity`
    pub line_total: Money<'a, Currency>,

    /// Whether the bulk price is in effect
    pub bulk_applied: bool,
}

impl<'c, 'a> From<&'c CartLine<'a>> for CartLineView<'c, 'a> {
    fn from(line: &'c CartLine<'a>) -> Self {
        CartLineView {
            product_id: line.product_id(),
            product: line.product(),
            quantity: line.quantity(),
            effective_unit_price: line.unit_price(),
            line_total: line.total(),
            bulk_applied: line.bulk_applied(),
        }
    }
}

/// Cart
///
/// Lines are kept in the order their product was first added, and there is
/// never more than one line per product id.
#[derive(Debug)]
pub struct Cart<'a, O: CartObserver = NoopObserver> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
    observer: O,
}

impl Cart<'_> {
    /// Create an empty cart priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart::with_observer(currency, NoopObserver)
    }
}

impl<'a, O: CartObserver> Cart<'a, O> {
    /// Create an empty cart that reports changes to `observer`.
    pub fn with_observer(currency: &'static Currency, observer: O) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
            observer,
        }
    }

    pub(crate) fn from_parts(
        lines: Vec<CartLine<'a>>,
        currency: &'static Currency,
        observer: O,
    ) -> Self {
        Cart {
            lines,
            currency,
            observer,
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line for the same id grows by `quantity`; otherwise a new
    /// line is appended with a snapshot of `product`. Quantities below one are
    /// clamped to one. Products priced in another currency are ignored.
    pub fn add_to_cart(&mut self, product: &Product<'a>, quantity: i64) {
        if product.currency() != self.currency {
            warn!(
                product_id = %product.id,
                product_currency = product.currency().iso_alpha_code,
                cart_currency = self.currency.iso_alpha_code,
                "ignoring product priced in a different currency"
            );
            return;
        }

        let added = Quantity::clamped(quantity);

        let quantity = if let Some(line) = self.find_mut(product.id.as_str()) {
            line.quantity = line.quantity.saturating_add(added);
            line.quantity
        } else {
            self.lines.push(CartLine::new(product.clone(), added));
            added
        };

        if product
            .stock_quantity
            .is_some_and(|stock| quantity.get() > stock)
            || !product.in_stock
        {
            debug!(
                product_id = %product.id,
                quantity = quantity.get(),
                stock = ?product.stock_quantity,
                in_stock = product.in_stock,
                "cart quantity exceeds reported stock"
            );
        }

        debug!(product_id = %product.id, quantity = quantity.get(), "added to cart");

        self.notify(&CartEvent::Added {
            product_id: product.id.clone(),
            quantity,
        });
    }

    /// Look `id` up in `catalog` and add it. `quantity` defaults to one.
    ///
    /// Unknown ids leave the cart untouched.
    pub fn add_by_id<C>(&mut self, catalog: &C, id: &str, quantity: Option<i64>)
    where
        C: Catalog<'a> + ?Sized,
    {
        match catalog.product(id) {
            Some(product) => self.add_to_cart(product, quantity.unwrap_or(1)),
            None => warn!(product_id = id, "ignoring add for unknown product"),
        }
    }

    /// Replace the quantity of the line for `id`.
    ///
    /// Quantities below one remove the line. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        let Some(quantity) = Quantity::new(quantity) else {
            self.remove_from_cart(id);
            return;
        };

        let Some(line) = self.find_mut(id) else {
            debug!(product_id = id, "ignoring update for product not in cart");
            return;
        };

        if line.quantity == quantity {
            return;
        }

        line.quantity = quantity;
        let product_id = line.product.id.clone();

        debug!(%product_id, quantity = quantity.get(), "updated cart quantity");

        self.notify(&CartEvent::Updated {
            product_id,
            quantity,
        });
    }

    /// Remove the line for `id`, if there is one.
    pub fn remove_from_cart(&mut self, id: &str) {
        let Some(position) = self.position(id) else {
            return;
        };

        let line = self.lines.remove(position);

        debug!(product_id = %line.product.id, "removed from cart");

        self.notify(&CartEvent::Removed {
            product_id: line.product.id,
        });
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        if self.lines.is_empty() {
            return;
        }

        self.lines.clear();

        debug!("cleared cart");

        self.notify(&CartEvent::Cleared);
    }

    /// Re-snapshot every line from `catalog`.
    ///
    /// Lines keep their quantity and position. Lines whose product has left
    /// the catalog, or is now priced in another currency, are dropped.
    pub fn refresh_from<C>(&mut self, catalog: &C)
    where
        C: Catalog<'a> + ?Sized,
    {
        if self.lines.is_empty() {
            return;
        }

        let currency = self.currency;
        let before = self.lines.len();

        self.lines.retain_mut(|line| {
            match catalog
                .product(line.product.id.as_str())
                .filter(|product| product.currency() == currency)
            {
                Some(product) => {
                    line.product = product.clone();
                    true
                }
                None => {
                    warn!(product_id = %line.product.id, "dropping line no longer in catalog");
                    false
                }
            }
        });

        debug!(dropped = before - self.lines.len(), "refreshed cart from catalog");

        self.notify(&CartEvent::Refreshed);
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Sum of all line totals, after bulk pricing.
    pub fn total_price(&self) -> Money<'a, Currency> {
        self.sum_minor(CartLine::total)
    }

    /// Sum of all line totals at standard prices.
    pub fn standard_total_price(&self) -> Money<'a, Currency> {
        self.sum_minor(CartLine::standard_total)
    }

    fn sum_minor(
        &self,
        total: impl Fn(&CartLine<'a>) -> Money<'a, Currency>,
    ) -> Money<'a, Currency> {
        subtotal(self.currency, self.lines.iter().map(total))
    }

    /// Resolved view of every line, in cart order.
    pub fn lines(&self) -> SmallVec<[CartLineView<'_, 'a>; 8]> {
        self.lines.iter().map(CartLineView::from).collect()
    }

    /// Get the line for `id`.
    pub fn line(&self, id: &str) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.product.id.as_str() == id)
    }

    /// Iterate over the lines in cart order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Serialisable image of the cart.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from_lines(&self.lines, self.currency)
    }

    /// The cart's observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Consume the cart and return its observer.
    pub fn into_observer(self) -> O {
        self.observer
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product.id.as_str() == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut CartLine<'a>> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id.as_str() == id)
    }

    fn notify(&mut self, event: &CartEvent) {
        self.observer
            .cart_changed(event, &self.lines, self.currency);
    }
}

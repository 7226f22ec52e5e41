//! Cart Observer

use rusty_money::iso::Currency;

use crate::{cart::CartLine, products::ProductId, quantity::Quantity};

/// A state change applied to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A product was added. `quantity` is the line quantity after the add.
    Added {
        /// Product that was added
        product_id: ProductId,
        /// Resulting line quantity
        quantity: Quantity,
    },

    /// A line quantity was replaced.
    Updated {
        /// Product whose line changed
        product_id: ProductId,
        /// New line quantity
        quantity: Quantity,
    },

    /// A line was removed.
    Removed {
        /// Product whose line was removed
        product_id: ProductId,
    },

    /// Every line was removed.
    Cleared,

    /// Lines were re-read from the catalog.
    Refreshed,
}

/// Observer notified after each cart mutation that changed state.
///
/// Observers see the cart as it is after the change. They cannot fail the
/// mutation: anything that can go wrong on their side (such as persistence)
/// must be handled and reported by the observer itself.
///
/// With the default [`NoopObserver`] the calls compile away.
pub trait CartObserver {
    /// Called once per state-changing mutation.
    fn cart_changed(
        &mut self,
        event: &CartEvent,
        lines: &[CartLine<'_>],
        currency: &'static Currency,
    );
}

/// No-op observer for carts nobody is watching.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn cart_changed(&mut self, _: &CartEvent, _: &[CartLine<'_>], _: &'static Currency) {}
}

/// Observer that records every event it sees.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<CartEvent>,
}

impl EventLog {
    /// Events in the order they were observed.
    pub fn events(&self) -> &[CartEvent] {
        &self.events
    }
}

impl CartObserver for EventLog {
    fn cart_changed(&mut self, event: &CartEvent, _: &[CartLine<'_>], _: &'static Currency) {
        self.events.push(event.clone());
    }
}

//! Medcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartEvent, CartLine, CartLineView, CartObserver, CartSnapshot, EventLog,
        NoopObserver, SnapshotError,
    },
    catalog::{Catalog, InMemoryCatalog, ProductKey},
    config::{ConfigError, StoreConfig},
    persistence::{PersistenceError, SnapshotWriter, load_snapshot, save_snapshot},
    pricing::{bulk_applies, effective_unit_price, line_total, subtotal},
    products::{Product, ProductId},
    quantity::Quantity,
    shipping::ShippingPolicy,
    summary::{OrderSummary, SummaryError},
};

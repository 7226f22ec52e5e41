//! Cart Example
//!
//! This example builds a cart from a product fixture and prints its order summary.
//!
//! Use `-f` to load a fixture set by name
//! Use `-c` to load a store config by name
//! Use `-a ID:QTY` to add products, `-s ID:QTY` to set quantities and `-r ID` to remove lines
//! Use `-o` to write a snapshot of the cart to a YAML file
//!
//! Set `RUST_LOG=medcart=debug` to trace cart changes.

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use medcart::{
    cart::{Cart, CartObserver},
    config::StoreConfig,
    fixtures::Fixture,
    persistence::SnapshotWriter,
    summary::OrderSummary,
    utils::ExampleCartArgs,
};

/// Cart Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = ExampleCartArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let config = fixture.store_config(&args.config)?;

    if let Some(out) = args.out.as_deref() {
        let writer = SnapshotWriter::spawn(out)?;
        let mut cart = Cart::with_observer(fixture.currency()?, writer);
        fill(&mut cart, &fixture, &args);
        print(&cart, &config)?;
        cart.into_observer().finish();

        println!("Snapshot written to {out}");
    } else {
        let mut cart = fixture.cart()?;
        fill(&mut cart, &fixture, &args);
        print(&cart, &config)?;
    }

    Ok(())
}

fn fill<'a, O: CartObserver>(
    cart: &mut Cart<'a, O>,
    fixture: &Fixture<'a>,
    args: &ExampleCartArgs,
) {
    for (id, quantity) in &args.add {
        cart.add_by_id(fixture.catalog(), id, Some(*quantity));
    }

    for (id, quantity) in &args.set {
        cart.update_quantity(id, *quantity);
    }

    for id in &args.remove {
        cart.remove_from_cart(id);
    }
}

fn print<O: CartObserver>(cart: &Cart<'_, O>, config: &StoreConfig) -> Result<()> {
    let summary = OrderSummary::from_cart(cart, &config.shipping_policy());

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    summary.write_to(&mut handle, cart)?;

    Ok(())
}

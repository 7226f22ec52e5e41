//! Utils

use clap::Parser;

use crate::quantity::Quantity;

/// Arguments for the cart example
#[derive(Debug, Parser)]
pub struct ExampleCartArgs {
    /// Fixture set to load products from
    #[clap(short, long, default_value = "medical")]
    pub fixture: String,

    /// Store config to load from `fixtures/config`
    #[clap(short, long, default_value = "default")]
    pub config: String,

    /// Add a product, as `ID` or `ID:QTY`
    #[clap(short, long = "add", value_parser = parse_line)]
    pub add: Vec<(String, i64)>,

    /// Set the quantity of a line, as `ID:QTY`
    #[clap(short, long = "set", value_parser = parse_line)]
    pub set: Vec<(String, i64)>,

    /// Remove a line by product id
    #[clap(short, long = "remove")]
    pub remove: Vec<String>,

    /// Write a cart snapshot to this path after every change
    #[clap(short, long)]
    pub out: Option<String>,
}

/// Parse `ID` or `ID:QTY` into a product id and quantity.
///
/// The quantity is read leniently, so `ID:abc` becomes one unit.
///
/// # Errors
///
/// Returns an error if the id is empty.
pub fn parse_line(s: &str) -> Result<(String, i64), String> {
    let (id, quantity) = match s.split_once(':') {
        Some((id, quantity)) => (id.trim(), Quantity::from_input(quantity)),
        None => (s.trim(), 1),
    };

    if id.is_empty() {
        return Err(format!("missing product id in '{s}'"));
    }

    Ok((id.to_string(), quantity))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_line_defaults_to_one() -> TestResult {
        assert_eq!(parse_line("icu-ventilator")?, ("icu-ventilator".to_string(), 1));

        Ok(())
    }

    #[test]
    fn parse_line_reads_quantity() -> TestResult {
        assert_eq!(parse_line("icu-ventilator:2")?, ("icu-ventilator".to_string(), 2));
        assert_eq!(parse_line("icu-ventilator:0")?, ("icu-ventilator".to_string(), 0));
        assert_eq!(parse_line("icu-ventilator:x")?, ("icu-ventilator".to_string(), 1));

        Ok(())
    }

    #[test]
    fn parse_line_requires_id() {
        assert!(parse_line(":3").is_err());
    }
}

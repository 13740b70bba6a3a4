//! Cart table rendering

use std::io;

use rusty_money::MoneyError;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use super::{Cart, CartLine};

/// Errors that can occur when rendering a cart.
#[derive(Debug, Error)]
pub enum CartTableError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO(#[source] io::Error),
}

impl Cart {
    /// Write the cart lines as a table followed by the summary block.
    ///
    /// # Errors
    ///
    /// Returns a [`CartTableError`] if totals cannot be computed or writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), CartTableError> {
        let totals = self.totals()?;

        let mut builder = Builder::default();

        builder.push_record(["Line", "Product", "Supplier", "Qty", "Unit price", "Subtotal"]);

        for line in &self.lines {
            builder.push_record(line_record(line));
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..6), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "{table}").map_err(CartTableError::IO)?;
        writeln!(
            out,
            " Products ({}): {} units",
            totals.line_count, totals.total_units
        )
        .map_err(CartTableError::IO)?;
        writeln!(out, " Suppliers: {}", totals.distinct_suppliers).map_err(CartTableError::IO)?;
        writeln!(out, " Subtotal: {}", totals.subtotal).map_err(CartTableError::IO)?;

        let unavailable = self.unavailable_lines().count();

        if unavailable > 0 {
            writeln!(out, " {unavailable} line(s) can no longer be ordered")
                .map_err(CartTableError::IO)?;
        }

        Ok(())
    }
}

fn line_record(line: &CartLine) -> [String; 6] {
    let product = if line.is_orderable() {
        line.offer.name.clone()
    } else {
        format!("{} (unavailable)", line.offer.name)
    };

    [
        line.id.to_string(),
        product,
        line.offer.supplier.name.clone(),
        format!("{} {}", line.quantity, line.offer.unit_of_measure),
        line.offer.unit_price.to_string(),
        line.subtotal().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::cart::tests::line;

    use super::*;

    #[test]
    fn write_to_lists_every_line_and_the_summary() -> TestResult {
        let mut withdrawn = line(3, 2, 150, 1);
        withdrawn.offer.available = false;

        let cart = Cart::with_lines(
            [line(1, 1, 500, 1), line(2, 2, 200, 3), withdrawn],
            iso::PEN,
        )?;

        let mut out = Vec::new();

        cart.write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Product 1"), "missing line 1: {rendered}");
        assert!(rendered.contains("Product 2"), "missing line 2: {rendered}");
        assert!(
            rendered.contains("Product 3 (unavailable)"),
            "withdrawn line not flagged: {rendered}"
        );
        assert!(rendered.contains("Products (3): 5 units"), "{rendered}");
        assert!(rendered.contains("Suppliers: 2"), "{rendered}");
        assert!(rendered.contains("1 line(s) can no longer be ordered"), "{rendered}");

        Ok(())
    }
}

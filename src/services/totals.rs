//! Monetary totals.
//!
//! Line totals derive from quantity, unit price and tax rate; header
//! totals are the sum of line totals. Headers cache their aggregates, so
//! any item mutation must be followed by a header recomputation. All
//! arithmetic stays in `rust_decimal` to avoid binary float drift.

use rust_decimal::Decimal;

/// The three-level monetary breakdown of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineTotals {
    pub before_tax: Decimal,
    pub tax: Decimal,
    pub with_tax: Decimal,
}

/// Aggregate of a document's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentTotals {
    pub before_tax: Decimal,
    pub tax: Decimal,
    pub with_tax: Decimal,
}

/// Largest accepted quantity or money value: 15 digits with 2 decimal
/// places, the storage precision of the amount columns. Keeping inputs
/// below this also keeps every product and sum inside `Decimal`'s 96-bit
/// mantissa, so [`line_totals`] cannot overflow.
pub fn max_amount() -> Decimal {
    Decimal::new(10_000_000_000_000, 0)
}

/// Whether a quantity or money value fits the storage precision.
pub fn amount_in_bounds(value: Decimal) -> bool {
    value.abs() < max_amount()
}

/// Compute one line's totals. `tax_rate` is a percentage (e.g. 18).
/// Inputs must satisfy [`amount_in_bounds`]; callers validate before
/// computing.
pub fn line_totals(quantity: Decimal, unit_price: Decimal, tax_rate: Decimal) -> LineTotals {
    let before_tax = quantity * unit_price;
    let tax = before_tax * tax_rate / Decimal::from(100);
    LineTotals {
        before_tax,
        tax,
        with_tax: before_tax + tax,
    }
}

/// Sum line totals into header totals.
pub fn sum_lines<I>(lines: I) -> DocumentTotals
where
    I: IntoIterator<Item = LineTotals>,
{
    let mut before_tax = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    for line in lines {
        before_tax += line.before_tax;
        tax += line.tax;
    }
    DocumentTotals {
        before_tax,
        tax,
        with_tax: before_tax + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_math_at_eighteen_percent() {
        let line = line_totals(dec!(3), dec!(1000), dec!(18));
        assert_eq!(line.before_tax, dec!(3000));
        assert_eq!(line.tax, dec!(540));
        assert_eq!(line.with_tax, dec!(3540));
    }

    #[test]
    fn line_math_at_zero_percent() {
        let line = line_totals(dec!(2.5), dec!(400), Decimal::ZERO);
        assert_eq!(line.before_tax, dec!(1000.0));
        assert_eq!(line.tax, Decimal::ZERO);
        assert_eq!(line.with_tax, dec!(1000.0));
    }

    #[test]
    fn fractional_quantities_stay_exact() {
        let line = line_totals(dec!(0.1), dec!(0.2), Decimal::ZERO);
        assert_eq!(line.before_tax, dec!(0.02));
    }

    #[test]
    fn header_totals_are_item_sums() {
        let totals = sum_lines([
            line_totals(dec!(3), dec!(1000), dec!(18)),
            line_totals(dec!(2), dec!(1000), dec!(18)),
        ]);
        assert_eq!(totals.before_tax, dec!(5000));
        assert_eq!(totals.tax, dec!(900));
        assert_eq!(totals.with_tax, dec!(5900));
    }

    #[test]
    fn empty_document_has_zero_totals() {
        let totals = sum_lines([]);
        assert_eq!(totals, DocumentTotals::default());
    }

    #[test]
    fn bounds_reject_values_past_the_storage_precision() {
        assert!(amount_in_bounds(dec!(9_999_999_999_999.99)));
        assert!(amount_in_bounds(Decimal::ZERO));

        assert!(!amount_in_bounds(max_amount()));
        assert!(!amount_in_bounds(dec!(100_000_000_000_000)));
        assert!(!amount_in_bounds(Decimal::MAX));
    }

    #[test]
    fn bounded_inputs_multiply_without_overflow() {
        let limit = max_amount() - Decimal::ONE;
        let line = line_totals(limit, limit, dec!(18));
        assert_eq!(line.before_tax, limit * limit);
    }
}

//! Line-item and document arithmetic.
//!
//! Every total shown anywhere (form, preview, PDF) comes from [`aggregate`].
//! Renderers receive its result and never sum items themselves.

use tracing::warn;

use crate::model::LineItem;

/// Largest line amount kept, in euros. Larger products are capped.
pub const MAX_LINE_AMOUNT: f64 = 1e15;

/// Document-level monetary totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Sum of pre-tax line totals.
    pub total_ht: f64,
    /// Sum of per-line tax amounts.
    pub total_tva: f64,
    /// `total_ht + total_tva`.
    pub total_ttc: f64,
}

/// Quantities and prices: non-finite or negative input counts as 0.
fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Tax rates: non-finite input counts as 0.
fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Cap an amount to `±MAX_LINE_AMOUNT`. Overflowed products land on the cap.
fn bounded(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    if v.abs() > MAX_LINE_AMOUNT {
        warn!(amount = v, cap = MAX_LINE_AMOUNT, "line amount out of range, capped");
        return MAX_LINE_AMOUNT.copysign(v);
    }
    v
}

/// Pre-tax amount of one line.
fn line_ht(item: &LineItem) -> f64 {
    bounded(non_negative(item.quantity) * non_negative(item.unit_price))
}

/// Return a copy of `item` with `total_ht` and `total_ttc` derived from its
/// quantity, unit price and tax rate. Never fails.
pub fn recompute(item: &LineItem) -> LineItem {
    let total_ht = line_ht(item);
    let total_ttc = bounded(total_ht * (1.0 + finite(item.tax_rate) / 100.0));
    LineItem {
        total_ht,
        total_ttc,
        ..item.clone()
    }
}

/// Tax amount of one line, from its raw inputs.
fn line_tva(item: &LineItem) -> f64 {
    bounded(line_ht(item) * finite(item.tax_rate) / 100.0)
}

/// Sum in ascending order so the result does not depend on item order.
fn ordered_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// Document totals for `items`.
///
/// Line totals are derived from each item's raw inputs, not from the stored
/// `total_ht`, so a stale snapshot cannot skew the figures.
pub fn aggregate(items: &[LineItem]) -> Totals {
    let total_ht = ordered_sum(items.iter().map(|i| recompute(i).total_ht).collect());
    let total_tva = ordered_sum(items.iter().map(line_tva).collect());
    Totals {
        total_ht,
        total_tva,
        total_ttc: total_ht + total_tva,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(q: f64, p: f64, t: f64) -> LineItem {
        LineItem {
            quantity: q,
            unit_price: p,
            tax_rate: t,
            ..LineItem::new(0.0)
        }
    }

    #[test]
    fn recompute_basic() {
        let out = recompute(&item(2.0, 100.0, 20.0));
        assert_eq!(out.total_ht, 200.0);
        assert_eq!(out.total_ttc, 240.0);
    }

    #[test]
    fn recompute_keeps_description() {
        let mut input = item(1.0, 5.0, 0.0);
        input.description = "Audit".to_string();
        assert_eq!(recompute(&input).description, "Audit");
    }

    #[test]
    fn recompute_bad_inputs_are_zero() {
        assert_eq!(recompute(&item(f64::NAN, 10.0, 20.0)).total_ht, 0.0);
        assert_eq!(recompute(&item(-3.0, 10.0, 20.0)).total_ht, 0.0);
        assert_eq!(recompute(&item(3.0, f64::INFINITY, 20.0)).total_ht, 0.0);
        let nan_tax = recompute(&item(2.0, 10.0, f64::NAN));
        assert_eq!(nan_tax.total_ht, 20.0);
        assert_eq!(nan_tax.total_ttc, 20.0);
    }

    #[test]
    fn aggregate_empty_is_zero() {
        assert_eq!(aggregate(&[]), Totals::default());
    }

    #[test]
    fn aggregate_mixed_rates() {
        let totals = aggregate(&[item(2.0, 100.0, 20.0), item(1.0, 50.0, 5.5)]);
        assert_eq!(totals.total_ht, 250.0);
        assert_eq!(totals.total_tva, 40.0 + 2.75);
        assert_eq!(totals.total_ttc, totals.total_ht + totals.total_tva);
    }

    #[test]
    fn aggregate_ignores_stale_stored_totals() {
        let mut stale = item(2.0, 100.0, 20.0);
        stale.total_ht = 9999.0;
        stale.total_ttc = 1.0;
        assert_eq!(aggregate(&[stale]).total_ht, 200.0);
    }

    #[test]
    fn overflowing_products_are_capped() {
        let huge = item(1e200, 1e200, 20.0);
        let out = recompute(&huge);
        assert_eq!(out.total_ht, MAX_LINE_AMOUNT);
        assert_eq!(out.total_ttc, MAX_LINE_AMOUNT);

        let totals = aggregate(&[huge, item(1.0, 10.0, 0.0)]);
        assert!(totals.total_ht.is_finite() && totals.total_tva.is_finite());
        assert_eq!(totals.total_ht, MAX_LINE_AMOUNT + 10.0);
        assert_eq!(totals.total_tva, 2e14);
    }
}

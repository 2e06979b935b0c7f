use invoice_core::calc::{aggregate, recompute};
use invoice_core::contract::format_currency;
use invoice_core::LineItem;
use proptest::prelude::*;

fn item_strategy() -> impl Strategy<Value = LineItem> {
    (
        -10.0f64..1_000.0,
        -50.0f64..100_000.0,
        prop_oneof![Just(0.0), Just(5.5), Just(10.0), Just(20.0), 0.0f64..100.0],
    )
        .prop_map(|(quantity, unit_price, tax_rate)| LineItem {
            description: "line".to_string(),
            quantity,
            unit_price,
            tax_rate,
            ..LineItem::new(0.0)
        })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn line_totals_are_never_negative(item in item_strategy()) {
        let out = recompute(&item);
        prop_assert!(out.total_ht >= 0.0);
        prop_assert!(out.total_ttc >= out.total_ht);
    }

    #[test]
    fn recompute_is_idempotent(item in item_strategy()) {
        let once = recompute(&item);
        prop_assert_eq!(recompute(&once), once);
    }

    #[test]
    fn ttc_is_ht_plus_tva(items in prop::collection::vec(item_strategy(), 0..20)) {
        let totals = aggregate(&items);
        prop_assert_eq!(totals.total_ttc, totals.total_ht + totals.total_tva);
        prop_assert!(totals.total_tva >= 0.0);
    }

    #[test]
    fn aggregate_matches_sum_of_lines(items in prop::collection::vec(item_strategy(), 0..20)) {
        let totals = aggregate(&items);
        let expected: f64 = items.iter().map(|i| recompute(i).total_ht).sum();
        prop_assert!(close(totals.total_ht, expected));
    }

    #[test]
    fn aggregate_ignores_item_order(items in prop::collection::vec(item_strategy(), 0..20)) {
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert_eq!(aggregate(&items), aggregate(&reversed));

        let mut rotated = items.clone();
        if !rotated.is_empty() {
            rotated.rotate_left(1);
        }
        prop_assert_eq!(aggregate(&items), aggregate(&rotated));
    }

    #[test]
    fn currency_always_has_two_decimals(value in -1.0e9f64..1.0e9) {
        let s = format_currency(value);
        prop_assert!(s.ends_with(" €"));
        let number = s.trim_end_matches(" €");
        let (_, cents) = number.rsplit_once(',').unwrap();
        prop_assert_eq!(cents.len(), 2);
        prop_assert!(!number.contains('.'));
    }
}

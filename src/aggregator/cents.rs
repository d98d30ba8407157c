use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Whole-cent count of `amount`, rounded half-to-even.
///
/// `None` when the cent count does not fit the decimal or `i128` range.
pub fn cents(amount: &Decimal) -> Option<i128> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i128()
}

/// True when `amount`, rounded to the nearest cent, ends in exactly `.01`.
///
/// Uses floor modulo, so negative amounts such as `-3.99` (−399 ≡ 1 mod 100)
/// are counted too.
///
/// | Amount  | Counted |
/// |---------|---------|
/// | 10.01   | yes     |
/// | 0.01    | yes     |
/// | -3.99   | yes     |
/// | 10.00   | no      |
/// | 10.02   | no      |
/// | 10.10   | no      |
/// | -0.01   | no      |
pub fn is_fractional_cent(amount: &Decimal) -> bool {
    cents(amount).is_some_and(|c| c.rem_euclid(100) == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fractional_cent_boundaries() {
        assert!(is_fractional_cent(&dec!(10.01)));
        assert!(is_fractional_cent(&dec!(0.01)));
        assert!(is_fractional_cent(&dec!(100.01)));
        assert!(is_fractional_cent(&dec!(-3.99)));
        assert!(!is_fractional_cent(&dec!(10.00)));
        assert!(!is_fractional_cent(&dec!(10.02)));
        assert!(!is_fractional_cent(&dec!(10.10)));
        assert!(!is_fractional_cent(&dec!(-0.01)));
        assert!(!is_fractional_cent(&dec!(0)));
    }

    #[test]
    fn test_rounds_to_nearest_cent_first() {
        assert!(is_fractional_cent(&dec!(10.0149)));
        assert!(is_fractional_cent(&dec!(10.006)));
        assert!(!is_fractional_cent(&dec!(10.0151)));
        // Half-to-even: 1000.5 -> 1000, 1001.5 -> 1002.
        assert!(!is_fractional_cent(&dec!(10.005)));
        assert!(!is_fractional_cent(&dec!(10.015)));
    }

    #[test]
    fn test_out_of_range_is_not_counted() {
        assert!(!is_fractional_cent(&Decimal::MAX));
        assert!(!is_fractional_cent(&Decimal::MIN));
    }

    proptest! {
        #[test]
        fn prop_counted_iff_cents_end_in_01(c in -10_000_000_000i64..10_000_000_000i64) {
            let amount = Decimal::new(c, 2);
            prop_assert_eq!(is_fractional_cent(&amount), c.rem_euclid(100) == 1);
        }

        #[test]
        fn prop_float_amounts_match_float_predicate(c in -1_000_000_000i64..1_000_000_000i64) {
            let value = c as f64 / 100.0;
            let expected = ((value * 100.0).round() as i64).rem_euclid(100) == 1;
            let amount = crate::aggregator::coerce_deposit(&crate::table::Cell::Float(value))
                .expect("finite float coerces");
            prop_assert_eq!(is_fractional_cent(&amount), expected);
        }

        #[test]
        fn prop_integral_amounts_never_counted(n in any::<i64>()) {
            prop_assert!(!is_fractional_cent(&Decimal::from(n)));
        }
    }
}

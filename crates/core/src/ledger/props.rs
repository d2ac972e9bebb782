//! Property-based tests for ledger operations.
//!
//! - Set/get round-trip
//! - Modify additivity
//! - Merge idempotence
//! - Report readiness

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::book::Ledger;
use super::error::LedgerError;
use super::quote::RateQuote;

const CODES: [&str; 3] = ["rub", "usd", "eur"];

/// Strategy to generate balances (-1,000,000.00 to 1,000,000.00).
fn balance() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(CODES.to_vec())
}

fn ledger() -> Ledger {
    Ledger::new("rub", CODES.iter().map(|code| (*code, Decimal::ZERO))).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* configured currency, a set value reads back exactly.
    #[test]
    fn prop_set_then_get_round_trips(code in code(), value in balance()) {
        let mut ledger = ledger();
        ledger.set_balance(code, value).unwrap();
        prop_assert_eq!(ledger.get_balance(code).unwrap(), value);
    }

    /// *For any* two deltas, applying them one by one equals applying their sum.
    #[test]
    fn prop_modify_is_additive(
        code in code(),
        start in balance(),
        d1 in balance(),
        d2 in balance(),
    ) {
        let mut stepwise = ledger();
        stepwise.set_balance(code, start).unwrap();
        stepwise.modify_balance(code, d1).unwrap();
        stepwise.modify_balance(code, d2).unwrap();

        let mut combined = ledger();
        combined.set_balance(code, start).unwrap();
        combined.modify_balance(code, d1 + d2).unwrap();

        prop_assert_eq!(
            stepwise.get_balance(code).unwrap(),
            combined.get_balance(code).unwrap()
        );
    }

    /// *For any* quote, merging it a second time reports no change.
    #[test]
    fn prop_merge_is_idempotent(usd in positive_rate(), eur in positive_rate()) {
        let mut ledger = ledger();
        let quote: RateQuote = [("usd", usd), ("eur", eur)].into_iter().collect();
        prop_assert!(ledger.merge_rates(&quote));
        prop_assert!(!ledger.merge_rates(&quote));
    }

    /// The report fails until every foreign rate is known and never afterwards.
    #[test]
    fn prop_report_ready_after_all_rates(
        usd in positive_rate(),
        eur in positive_rate(),
        later in prop::collection::vec((code(), positive_rate()), 0..5),
    ) {
        let mut ledger = ledger();
        let not_ready = matches!(ledger.render_report(), Err(LedgerError::RatesNotReady(_)));
        prop_assert!(not_ready);

        ledger.merge_rates(&[("usd", usd)].into_iter().collect());
        let not_ready = matches!(ledger.render_report(), Err(LedgerError::RatesNotReady(_)));
        prop_assert!(not_ready);

        ledger.merge_rates(&[("eur", eur)].into_iter().collect());
        prop_assert!(ledger.render_report().is_ok());

        for (code, rate) in later {
            ledger.merge_rates(&[(code, rate)].into_iter().collect());
            prop_assert!(ledger.render_report().is_ok());
        }
    }
}

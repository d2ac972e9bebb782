//! The balance and rate table for every configured currency.
//!
//! Invariants held by [`Ledger`]:
//! - the currency set is non-empty, fixed after construction and keeps insertion order
//! - exactly one entry is the base unit, whose rate is always one
//! - foreign rates, once set, are strictly positive

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::error::LedgerError;
use super::quote::RateQuote;

/// A batch of per-currency amounts keyed by currency code.
///
/// Codes are matched without regard to case, so a batch naming the same
/// currency twice (`"USD"` and `"usd"`) is rejected as a whole.
pub type BalanceBatch = BTreeMap<String, Decimal>;

/// Balance and rate of a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyState {
    /// Current balance. May go negative through `modify_balance`.
    pub balance: Decimal,
    /// Rate against the base unit; `None` until the first successful fetch.
    pub rate: Option<Decimal>,
}

#[derive(Debug, Clone)]
struct Slot {
    code: String,
    state: CurrencyState,
}

/// In-memory multi-currency ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    base: usize,
    slots: Vec<Slot>,
}

impl Ledger {
    /// Builds a ledger from initial balances, in insertion order.
    ///
    /// Codes are lower-cased. `base` must appear among the balances and at
    /// least one foreign currency is required.
    pub fn new<I, S>(base: &str, balances: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let base_code = base.trim().to_ascii_lowercase();
        let mut slots: Vec<Slot> = Vec::new();

        for (code, balance) in balances {
            let code = code.as_ref().trim().to_ascii_lowercase();
            if code.is_empty() {
                return Err(LedgerError::InvalidConfiguration(
                    "currency code must not be empty".to_string(),
                ));
            }
            if slots.iter().any(|slot| slot.code == code) {
                return Err(LedgerError::InvalidConfiguration(format!(
                    "currency {code} is configured twice"
                )));
            }
            let rate = (code == base_code).then_some(Decimal::ONE);
            slots.push(Slot {
                code,
                state: CurrencyState { balance, rate },
            });
        }

        let base = slots
            .iter()
            .position(|slot| slot.code == base_code)
            .ok_or_else(|| {
                LedgerError::InvalidConfiguration(format!(
                    "base currency {base_code} has no initial balance"
                ))
            })?;

        if slots.len() < 2 {
            return Err(LedgerError::InvalidConfiguration(
                "at least one foreign currency is required".to_string(),
            ));
        }

        Ok(Self { base, slots })
    }

    /// Code of the base currency.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.slots[self.base].code
    }

    /// All currency codes in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.code.as_str())
    }

    /// Foreign currency codes in insertion order.
    pub fn foreign_codes(&self) -> impl Iterator<Item = &str> {
        self.foreign_slots().map(|slot| slot.code.as_str())
    }

    /// Returns true if `code` is configured.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    /// Returns the balance and rate for `code`.
    pub fn state(&self, code: &str) -> Result<CurrencyState, LedgerError> {
        let idx = self.require(code)?;
        Ok(self.slots[idx].state)
    }

    /// Returns the balance for `code`.
    pub fn get_balance(&self, code: &str) -> Result<Decimal, LedgerError> {
        self.state(code).map(|state| state.balance)
    }

    /// Overwrites the balance for `code`.
    ///
    /// Returns whether the stored value actually changed.
    pub fn set_balance(&mut self, code: &str, value: Decimal) -> Result<bool, LedgerError> {
        let idx = self.require(code)?;
        let state = &mut self.slots[idx].state;
        let changed = state.balance != value;
        state.balance = value;
        Ok(changed)
    }

    /// Adds `delta` to the balance for `code`.
    ///
    /// Always reports a change, even for a zero delta.
    pub fn modify_balance(&mut self, code: &str, delta: Decimal) -> Result<bool, LedgerError> {
        let idx = self.require(code)?;
        let slot = &mut self.slots[idx];
        slot.state.balance = slot
            .state
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::Overflow(slot.code.clone()))?;
        Ok(true)
    }

    /// Applies every update in `batch`, or none of them.
    ///
    /// Returns whether any stored value changed.
    pub fn set_balances(&mut self, batch: &BalanceBatch) -> Result<bool, LedgerError> {
        let targets = self.require_all(batch)?;
        let mut changed = false;
        for (idx, value) in targets {
            let state = &mut self.slots[idx].state;
            changed |= state.balance != value;
            state.balance = value;
        }
        Ok(changed)
    }

    /// Adds every delta in `batch`, or none of them.
    pub fn modify_balances(&mut self, batch: &BalanceBatch) -> Result<(), LedgerError> {
        let targets = self.require_all(batch)?;
        let mut updated: Vec<Decimal> = self.slots.iter().map(|slot| slot.state.balance).collect();
        for (idx, delta) in targets {
            updated[idx] = updated[idx]
                .checked_add(delta)
                .ok_or_else(|| LedgerError::Overflow(self.slots[idx].code.clone()))?;
        }
        for (slot, balance) in self.slots.iter_mut().zip(updated) {
            slot.state.balance = balance;
        }
        Ok(())
    }

    /// Merges freshly fetched rates into the foreign currencies.
    ///
    /// A currency with no rate yet counts as changed on its first merge.
    /// Currencies missing from the quote keep their previous rate.
    /// Returns whether any foreign rate changed.
    pub fn merge_rates(&mut self, quote: &RateQuote) -> bool {
        let base = self.base;
        let mut changed = false;
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if idx == base {
                continue;
            }
            match quote.get(&slot.code) {
                Some(rate) if rate <= Decimal::ZERO => {
                    warn!(currency = %slot.code, %rate, "Ignoring non-positive rate");
                }
                Some(rate) => {
                    changed |= slot.state.rate != Some(rate);
                    slot.state.rate = Some(rate);
                }
                None => {
                    warn!(currency = %slot.code, "Currency missing from rate quote");
                }
            }
        }
        changed
    }

    /// Renders `"<code>: <balance>"` for a single currency.
    pub fn render_balance(&self, code: &str) -> Result<String, LedgerError> {
        let idx = self.require(code)?;
        let slot = &self.slots[idx];
        Ok(format!("{}: {}", slot.code, slot.state.balance.normalize()))
    }

    /// Returns true once every foreign currency has a rate.
    #[must_use]
    pub fn rates_ready(&self) -> bool {
        self.foreign_slots().all(|slot| slot.state.rate.is_some())
    }

    /// `(code, balance)` pairs in insertion order.
    pub(crate) fn balances(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.slots
            .iter()
            .map(|slot| (slot.code.as_str(), slot.state.balance))
    }

    /// `(code, balance, rate)` for every foreign currency, or the list of
    /// currencies still waiting for a rate.
    pub(crate) fn foreign_rates(&self) -> Result<Vec<(&str, Decimal, Decimal)>, LedgerError> {
        let missing: Vec<String> = self
            .foreign_slots()
            .filter(|slot| slot.state.rate.is_none())
            .map(|slot| slot.code.clone())
            .collect();
        if !missing.is_empty() {
            return Err(LedgerError::RatesNotReady(missing));
        }

        Ok(self
            .foreign_slots()
            .filter_map(|slot| {
                slot.state
                    .rate
                    .map(|rate| (slot.code.as_str(), slot.state.balance, rate))
            })
            .collect())
    }

    fn foreign_slots(&self) -> impl Iterator<Item = &Slot> {
        let base = self.base;
        self.slots
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != base)
            .map(|(_, slot)| slot)
    }

    fn position(&self, code: &str) -> Option<usize> {
        let code = code.trim();
        self.slots
            .iter()
            .position(|slot| slot.code.eq_ignore_ascii_case(code))
    }

    fn require(&self, code: &str) -> Result<usize, LedgerError> {
        self.position(code)
            .ok_or_else(|| LedgerError::UnknownCurrency(code.to_string()))
    }

    fn require_all(&self, batch: &BalanceBatch) -> Result<Vec<(usize, Decimal)>, LedgerError> {
        let mut targets: Vec<(usize, Decimal)> = Vec::with_capacity(batch.len());
        for (code, amount) in batch {
            let idx = self.require(code)?;
            if targets.iter().any(|(seen, _)| *seen == idx) {
                return Err(LedgerError::DuplicateCurrency(self.slots[idx].code.clone()));
            }
            targets.push((idx, *amount));
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn ledger() -> Ledger {
        Ledger::new(
            "rub",
            [("rub", dec!(1000)), ("usd", dec!(10)), ("eur", dec!(5))],
        )
        .unwrap()
    }

    fn batch(items: &[(&str, Decimal)]) -> BalanceBatch {
        items
            .iter()
            .map(|(code, amount)| ((*code).to_string(), *amount))
            .collect()
    }

    #[rstest]
    fn test_new_keeps_insertion_order(ledger: Ledger) {
        assert_eq!(ledger.codes().collect::<Vec<_>>(), ["rub", "usd", "eur"]);
        assert_eq!(ledger.foreign_codes().collect::<Vec<_>>(), ["usd", "eur"]);
        assert_eq!(ledger.base(), "rub");
    }

    #[rstest]
    fn test_base_rate_is_one_and_foreign_rates_unset(ledger: Ledger) {
        assert_eq!(ledger.state("rub").unwrap().rate, Some(Decimal::ONE));
        assert_eq!(ledger.state("usd").unwrap().rate, None);
        assert!(!ledger.rates_ready());
    }

    #[rstest]
    #[case::missing_base(vec![("usd", dec!(1)), ("eur", dec!(1))])]
    #[case::no_foreign(vec![("rub", dec!(1))])]
    #[case::duplicate(vec![("rub", dec!(1)), ("usd", dec!(1)), ("USD", dec!(2))])]
    #[case::empty_code(vec![("rub", dec!(1)), ("", dec!(1))])]
    fn test_new_rejects_invalid_sets(#[case] balances: Vec<(&str, Decimal)>) {
        let err = Ledger::new("rub", balances).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfiguration(_)));
    }

    #[rstest]
    fn test_unknown_currency(mut ledger: Ledger) {
        assert_eq!(
            ledger.get_balance("gbp"),
            Err(LedgerError::UnknownCurrency("gbp".into()))
        );
        assert!(ledger.set_balance("gbp", dec!(1)).is_err());
        assert!(ledger.modify_balance("gbp", dec!(1)).is_err());
        assert!(ledger.render_balance("gbp").is_err());
    }

    #[rstest]
    fn test_lookup_ignores_case(ledger: Ledger) {
        assert!(ledger.contains("USD"));
        assert_eq!(ledger.render_balance("USD").unwrap(), "usd: 10");
    }

    #[rstest]
    fn test_set_balance_reports_change(mut ledger: Ledger) {
        assert!(ledger.set_balance("usd", dec!(20)).unwrap());
        assert!(!ledger.set_balance("usd", dec!(20.00)).unwrap());
        assert_eq!(ledger.get_balance("usd").unwrap(), dec!(20));
    }

    #[rstest]
    fn test_modify_balance_always_changes(mut ledger: Ledger) {
        assert!(ledger.modify_balance("eur", Decimal::ZERO).unwrap());
        assert!(ledger.modify_balance("eur", dec!(-7.5)).unwrap());
        assert_eq!(ledger.get_balance("eur").unwrap(), dec!(-2.5));
    }

    #[rstest]
    fn test_modify_balance_overflow(mut ledger: Ledger) {
        ledger.set_balance("usd", Decimal::MAX).unwrap();
        assert_eq!(
            ledger.modify_balance("usd", Decimal::MAX),
            Err(LedgerError::Overflow("usd".into()))
        );
        assert_eq!(ledger.get_balance("usd").unwrap(), Decimal::MAX);
    }

    #[rstest]
    fn test_set_balances_is_atomic(mut ledger: Ledger) {
        let err = ledger
            .set_balances(&batch(&[("usd", dec!(1)), ("gbp", dec!(2))]))
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownCurrency("gbp".into()));
        assert_eq!(ledger.get_balance("usd").unwrap(), dec!(10));
    }

    #[rstest]
    fn test_set_balances_detects_change(mut ledger: Ledger) {
        assert!(!ledger.set_balances(&batch(&[("usd", dec!(10)), ("eur", dec!(5))])).unwrap());
        assert!(ledger.set_balances(&batch(&[("usd", dec!(10)), ("eur", dec!(6))])).unwrap());
        assert_eq!(ledger.get_balance("eur").unwrap(), dec!(6));
    }

    #[rstest]
    fn test_modify_balances_is_atomic(mut ledger: Ledger) {
        assert!(ledger
            .modify_balances(&batch(&[("eur", dec!(1)), ("xau", dec!(1))]))
            .is_err());
        assert_eq!(ledger.get_balance("eur").unwrap(), dec!(5));

        ledger
            .modify_balances(&batch(&[("eur", dec!(1)), ("rub", dec!(-100))]))
            .unwrap();
        assert_eq!(ledger.get_balance("eur").unwrap(), dec!(6));
        assert_eq!(ledger.get_balance("rub").unwrap(), dec!(900));
    }

    #[rstest]
    fn test_batch_naming_currency_twice_is_rejected(mut ledger: Ledger) {
        let twice = batch(&[("usd", dec!(1)), ("USD", dec!(2)), ("eur", dec!(7))]);
        assert_eq!(
            ledger.set_balances(&twice),
            Err(LedgerError::DuplicateCurrency("usd".into()))
        );
        assert_eq!(
            ledger.modify_balances(&twice),
            Err(LedgerError::DuplicateCurrency("usd".into()))
        );
        assert_eq!(ledger.get_balance("usd").unwrap(), dec!(10));
        assert_eq!(ledger.get_balance("eur").unwrap(), dec!(5));
    }

    #[rstest]
    fn test_merge_rates_first_fill_is_a_change(mut ledger: Ledger) {
        let quote: RateQuote = [("usd", dec!(90)), ("eur", dec!(100))].into_iter().collect();
        assert!(ledger.merge_rates(&quote));
        assert!(ledger.rates_ready());
        assert!(!ledger.merge_rates(&quote));
    }

    #[rstest]
    fn test_merge_rates_partial_quote(mut ledger: Ledger) {
        let quote: RateQuote = [("usd", dec!(90))].into_iter().collect();
        assert!(ledger.merge_rates(&quote));
        assert_eq!(ledger.state("usd").unwrap().rate, Some(dec!(90)));
        assert_eq!(ledger.state("eur").unwrap().rate, None);
        assert!(!ledger.rates_ready());
    }

    #[rstest]
    fn test_merge_rates_never_touches_base(mut ledger: Ledger) {
        let quote: RateQuote = [("rub", dec!(2)), ("usd", dec!(90))].into_iter().collect();
        ledger.merge_rates(&quote);
        assert_eq!(ledger.state("rub").unwrap().rate, Some(Decimal::ONE));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1))]
    fn test_merge_rates_rejects_non_positive(mut ledger: Ledger, #[case] rate: Decimal) {
        let quote: RateQuote = [("usd", rate)].into_iter().collect();
        assert!(!ledger.merge_rates(&quote));
        assert_eq!(ledger.state("usd").unwrap().rate, None);
    }

    #[rstest]
    fn test_render_balance_normalizes(mut ledger: Ledger) {
        ledger.set_balance("usd", dec!(10.50)).unwrap();
        assert_eq!(ledger.render_balance("usd").unwrap(), "usd: 10.5");
    }
}

//! Rates captured by one fetch cycle.

use std::collections::HashMap;

use rust_decimal::Decimal;

/// Rates of foreign currencies against the base unit, from a single fetch.
///
/// Keys are lower-case currency codes. A quote lives for one refresh cycle
/// and is discarded after it has been merged into the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateQuote {
    rates: HashMap<String, Decimal>,
}

impl RateQuote {
    /// Creates an empty quote.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the rate for `code`, replacing any earlier value.
    pub fn insert(&mut self, code: &str, rate: Decimal) {
        self.rates.insert(code.to_ascii_lowercase(), rate);
    }

    /// Returns the rate for `code`, if the quote carries one.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates.get(&code.to_ascii_lowercase()).copied()
    }

    /// Number of currencies in the quote.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the quote carries no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, Decimal)> for RateQuote {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        let mut quote = Self::new();
        for (code, rate) in iter {
            quote.insert(code.as_ref(), rate);
        }
        quote
    }
}

//! Plain-text ledger report.
//!
//! Layout, in currency insertion order:
//!
//! ```text
//! rub: 1000
//! usd: 10
//! eur: 5
//!
//! usd-eur: 1.11
//! rub-usd: 90.0
//! rub-eur: 100.0
//!
//! sum 2400.00 rub / 26.67 usd / 24.00 eur
//! ```
//!
//! Balance, cross-rate and base-rate lines each end with a single space.

use rust_decimal::{Decimal, RoundingStrategy};

use super::book::Ledger;
use super::error::LedgerError;

/// Decimal places for cross-rates and totals.
const AMOUNT_DP: u32 = 2;

/// Decimal places for base-unit rates.
const RATE_DP: u32 = 1;

/// Exchange ratio between two foreign currencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossRate {
    /// Currency with the lower rate against the base unit.
    pub low: String,
    /// Currency with the higher rate against the base unit.
    pub high: String,
    /// `high rate / low rate`, always >= 1.
    pub ratio: Decimal,
}

impl CrossRate {
    /// Computes the cross-rate between two currencies from their base-unit rates.
    ///
    /// On equal rates the pair keeps its given order. Fails with `Overflow`
    /// when the ratio leaves the decimal range.
    pub fn between(
        code_a: &str,
        rate_a: Decimal,
        code_b: &str,
        rate_b: Decimal,
    ) -> Result<Self, LedgerError> {
        let (low, low_rate, high, high_rate) = if rate_a > rate_b {
            (code_b, rate_b, code_a, rate_a)
        } else {
            (code_a, rate_a, code_b, rate_b)
        };
        let ratio = high_rate
            .checked_div(low_rate)
            .ok_or_else(|| LedgerError::Overflow(format!("{low}-{high}")))?;
        Ok(Self {
            low: low.to_string(),
            high: high.to_string(),
            ratio,
        })
    }

    /// Renders `"<low>-<high>: <ratio>"` with two decimal places.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{}-{}: {:.2}",
            self.low,
            self.high,
            round(self.ratio, AMOUNT_DP)
        )
    }
}

/// Rounds with Banker's Rounding, like every other figure in the ledger.
fn round(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

impl Ledger {
    /// Total value of all balances expressed in the base unit.
    pub fn total_in_base(&self) -> Result<Decimal, LedgerError> {
        let rates = self.foreign_rates()?;
        let mut total = self.get_balance(self.base())?;
        for (code, balance, rate) in rates {
            total = rate
                .checked_mul(balance)
                .and_then(|value| total.checked_add(value))
                .ok_or_else(|| LedgerError::Overflow(code.to_string()))?;
        }
        Ok(total)
    }

    /// Cross-rates for every pair of foreign currencies, in insertion order.
    pub fn cross_rates(&self) -> Result<Vec<CrossRate>, LedgerError> {
        let rates = self.foreign_rates()?;
        let mut pairs = Vec::new();
        for (i, (code_a, _, rate_a)) in rates.iter().enumerate() {
            for (code_b, _, rate_b) in &rates[i + 1..] {
                pairs.push(CrossRate::between(code_a, *rate_a, code_b, *rate_b)?);
            }
        }
        Ok(pairs)
    }

    /// Renders the full report: balances, cross-rates, base rates and totals.
    ///
    /// Fails with `RatesNotReady` until every foreign currency has a rate.
    pub fn render_report(&self) -> Result<String, LedgerError> {
        let rates = self.foreign_rates()?;
        let total = self.total_in_base()?;
        let base = self.base();

        let mut out = String::new();
        for (code, balance) in self.balances() {
            out.push_str(&format!("{code}: {} \n", balance.normalize()));
        }

        out.push('\n');
        for cross in self.cross_rates()? {
            out.push_str(&cross.render());
            out.push_str(" \n");
        }
        for (code, _, rate) in &rates {
            out.push_str(&format!("{base}-{code}: {:.1} \n", round(*rate, RATE_DP)));
        }

        out.push('\n');
        out.push_str(&format!("sum {:.2} {base}", round(total, AMOUNT_DP)));
        for (code, _, rate) in &rates {
            let converted = total
                .checked_div(*rate)
                .ok_or_else(|| LedgerError::Overflow((*code).to_string()))?;
            out.push_str(&format!(" / {:.2} {code}", round(converted, AMOUNT_DP)));
        }
        out.push('\n');

        Ok(out)
    }
}

//! Launch arguments: polling period, initial balances and the debug switch.

use clap::Parser;
use rust_decimal::Decimal;

/// Tokens that turn debug output on.
pub const ON_SWITCHES: [&str; 5] = ["1", "true", "True", "y", "Y"];
/// Tokens that leave debug output off.
pub const OFF_SWITCHES: [&str; 5] = ["0", "false", "False", "n", "N"];

/// FxLedger - in-memory multi-currency balance ledger
#[derive(Debug, Parser)]
#[command(name = "fxledger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Seconds between exchange rate refreshes
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub period: u64,

    /// Initial RUB balance (base currency)
    #[arg(long, allow_negative_numbers = true)]
    pub rub: Decimal,

    /// Initial USD balance
    #[arg(long, allow_negative_numbers = true)]
    pub usd: Decimal,

    /// Initial EUR balance
    #[arg(long, allow_negative_numbers = true)]
    pub eur: Decimal,

    /// Initial CNY balance
    #[arg(long, allow_negative_numbers = true)]
    pub cny: Option<Decimal>,

    /// Additional foreign currency as CODE=AMOUNT (repeatable)
    #[arg(long = "currency", value_name = "CODE=AMOUNT", value_parser = parse_currency)]
    pub currencies: Vec<(String, Decimal)>,

    /// Debug output switch (1/true/True/y/Y or 0/false/False/n/N)
    #[arg(
        long,
        value_name = "SWITCH",
        value_parser = parse_switch,
        action = clap::ArgAction::Set,
        default_value = "0"
    )]
    pub debug: bool,
}

impl Cli {
    /// Code of the base currency.
    pub const BASE: &'static str = "rub";

    /// Initial balances in insertion order: rub, usd, eur, cny, then extras.
    #[must_use]
    pub fn balances(&self) -> Vec<(String, Decimal)> {
        let mut balances = vec![
            (Self::BASE.to_string(), self.rub),
            ("usd".to_string(), self.usd),
            ("eur".to_string(), self.eur),
        ];
        if let Some(cny) = self.cny {
            balances.push(("cny".to_string(), cny));
        }
        balances.extend(self.currencies.iter().cloned());
        balances
    }
}

fn parse_switch(value: &str) -> Result<bool, String> {
    if ON_SWITCHES.contains(&value) {
        Ok(true)
    } else if OFF_SWITCHES.contains(&value) {
        Ok(false)
    } else {
        Err(format!(
            "expected one of {} or {}",
            ON_SWITCHES.join(" "),
            OFF_SWITCHES.join(" ")
        ))
    }
}

fn parse_currency(value: &str) -> Result<(String, Decimal), String> {
    let (code, amount) = value
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=AMOUNT, got {value}"))?;
    let code = code.trim().to_ascii_lowercase();
    if code.is_empty() {
        return Err("currency code must not be empty".to_string());
    }
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount for {code}: {e}"))?;
    Ok((code, amount))
}

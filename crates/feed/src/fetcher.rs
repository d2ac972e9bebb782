//! Client for the upstream daily rates endpoint.
//!
//! The endpoint answers `{"Valute": {"USD": {"Value": 90.1, "Nominal": 1, ...}, ...}}`.
//! Only the currencies the ledger asks for are extracted; entries that are
//! missing or malformed are logged and skipped, so a partial quote is valid.

use std::collections::HashMap;
use std::time::Duration;

use fxledger_core::RateQuote;
use fxledger_shared::RatesConfig;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FeedError;

#[derive(Debug, Deserialize)]
struct RatesPayload {
    #[serde(rename = "Valute")]
    valute: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RateEntry {
    #[serde(rename = "Value")]
    value: Decimal,
    /// Units of the foreign currency the value is quoted for (100 JPY, ...).
    #[serde(rename = "Nominal", default = "default_nominal")]
    nominal: Decimal,
}

fn default_nominal() -> Decimal {
    Decimal::ONE
}

impl RateEntry {
    /// Rate for a single unit, or `None` for a non-positive nominal or a
    /// quotient outside the decimal range.
    fn unit_rate(&self) -> Option<Decimal> {
        if self.nominal <= Decimal::ZERO {
            return None;
        }
        self.value.checked_div(self.nominal)
    }
}

/// Extracts the rates for `codes` from a rate source response body.
///
/// Codes are matched against the upper-case keys of the `Valute` object.
pub fn parse_quote<S: AsRef<str>>(body: &str, codes: &[S]) -> Result<RateQuote, FeedError> {
    let payload: RatesPayload = serde_json::from_str(body)?;
    let mut quote = RateQuote::new();

    for code in codes {
        let code = code.as_ref();
        let Some(raw) = payload.valute.get(&code.to_ascii_uppercase()) else {
            warn!(currency = %code, "Currency missing from rate source response");
            continue;
        };
        match RateEntry::deserialize(raw) {
            Ok(entry) => match entry.unit_rate() {
                Some(rate) => quote.insert(code, rate),
                None => warn!(
                    currency = %code,
                    value = %entry.value,
                    nominal = %entry.nominal,
                    "Rate entry has an unusable nominal"
                ),
            },
            Err(e) => warn!(currency = %code, error = %e, "Malformed rate entry"),
        }
    }

    Ok(quote)
}

/// HTTP client for the upstream rate source.
#[derive(Debug, Clone)]
pub struct RateFetcher {
    client: Client,
    url: String,
}

impl RateFetcher {
    /// Creates a fetcher for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Creates a fetcher from the `rates` configuration section.
    pub fn from_config(config: &RatesConfig) -> Result<Self, FeedError> {
        Self::new(config.url.clone(), config.timeout())
    }

    /// The configured endpoint.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issues one GET and extracts the rates for `codes`.
    pub async fn fetch<S: AsRef<str>>(&self, codes: &[S]) -> Result<RateQuote, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(url = %self.url, bytes = body.len(), "Rate source responded");
        parse_quote(&body, codes)
    }
}

//! Premium checkout links.
//!
//! Links are plain URLs pointing at the hosted checkout page; this crate never
//! talks to a payment provider itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Currency, Locale};

/// Default checkout host.
pub const DEFAULT_PAYMENT_BASE_URL: &str = "https://destinypath.onrender.com";

/// Errors raised while building a payment link.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Unknown payment type: {0}")]
    UnknownKind(String),
}

/// Product offered behind a premium button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Subscription,
    Single,
    Couple,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Subscription => "subscription",
            PaymentKind::Single => "single",
            PaymentKind::Couple => "couple",
        }
    }

    /// Price in minor units of `currency` (cents, or whole yen).
    pub fn price(&self, currency: Currency) -> u64 {
        match (self, currency) {
            (PaymentKind::Single, Currency::Usd) => 499,
            (PaymentKind::Single, Currency::Jpy) => 70_000,
            (PaymentKind::Couple, Currency::Usd) => 799,
            (PaymentKind::Couple, Currency::Jpy) => 110_000,
            (PaymentKind::Subscription, Currency::Usd) => 999,
            (PaymentKind::Subscription, Currency::Jpy) => 140_000,
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentKind {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "subscription" => Ok(PaymentKind::Subscription),
            "single" => Ok(PaymentKind::Single),
            "couple" => Ok(PaymentKind::Couple),
            _ => Err(PaymentError::UnknownKind(s.to_string())),
        }
    }
}

/// A resolved checkout link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLink {
    pub kind: PaymentKind,
    pub currency: Currency,
    pub amount: u64,
    pub url: String,
}

/// Builds checkout links against one base URL.
#[derive(Debug, Clone)]
pub struct PaymentLinks {
    base_url: String,
}

impl PaymentLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/payment?type={kind}&currency={currency}`; currency follows the locale.
    pub fn link(&self, kind: PaymentKind, locale: Locale) -> PaymentLink {
        let currency = locale.currency();
        PaymentLink {
            kind,
            currency,
            amount: kind.price(currency),
            url: format!(
                "{}/payment?type={}&currency={}",
                self.base_url, kind, currency
            ),
        }
    }
}

impl Default for PaymentLinks {
    fn default() -> Self {
        Self::new(DEFAULT_PAYMENT_BASE_URL)
    }
}

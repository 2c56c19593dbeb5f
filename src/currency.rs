// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::FxError;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_CURRENCY: &str = "USD";

const ZERO_DECIMAL: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "UYI", "VND",
    "VUV", "XAF", "XOF", "XPF",
];

const THREE_DECIMAL: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

const TWO_DECIMAL: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BMD", "BND", "BOB", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD", "CDF", "CHF",
    "CNY", "COP", "CRC", "CUP", "CVE", "CZK", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR",
    "FJD", "FKP", "GBP", "GEL", "GHS", "GIP", "GMD", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG",
    "HUF", "IDR", "ILS", "INR", "IRR", "JMD", "KES", "KGS", "KHR", "KYD", "KZT", "LAK", "LBP",
    "LKR", "LRD", "LSL", "MAD", "MDL", "MGA", "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR",
    "MWK", "MXN", "MYR", "MZN", "NAD", "NGN", "NIO", "NOK", "NPR", "NZD", "PAB", "PEN", "PGK",
    "PHP", "PKR", "PLN", "QAR", "RON", "RSD", "RUB", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD",
    "SHP", "SLE", "SLL", "SOS", "SRD", "SSP", "STN", "SYP", "SZL", "THB", "TJS", "TMT", "TOP",
    "TRY", "TTD", "TWD", "TZS", "UAH", "USD", "UYU", "UZS", "VES", "WST", "XCD", "YER", "ZAR",
    "ZMW", "ZWL",
];

/// ISO 4217 minor-unit exponents. Codes missing here (territorial pegs such as
/// FOK, GGP, IMP, JEP, KID, TVD, or units like XDR) have no canonical exponent
/// and only convert through the float fallback.
static EXPONENTS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for code in ZERO_DECIMAL {
        m.insert(*code, 0);
    }
    for code in TWO_DECIMAL {
        m.insert(*code, 2);
    }
    for code in THREE_DECIMAL {
        m.insert(*code, 3);
    }
    m
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub exponent: u32,
}

impl Currency {
    pub fn lookup(code: &str) -> Option<Currency> {
        let code = normalize_code(code);
        EXPONENTS.get(code.as_str()).map(|exp| Currency {
            code,
            exponent: *exp,
        })
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn exponent_for(code: &str) -> Option<u32> {
    EXPONENTS.get(normalize_code(code).as_str()).copied()
}

/// Display scale for a code; two digits when the code has no ISO exponent.
pub fn display_exponent(code: &str) -> u32 {
    exponent_for(code).unwrap_or(2)
}

/// Snapshot of conversion rates, all quoted against one base currency
/// (1 base = rate units of the code).
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: BTreeMap<String, Decimal>,
    rejected: Vec<String>,
}

impl RateTable {
    /// Build from validated decimal rates. The base currency always has rate 1.
    pub fn new(base: &str, rates: BTreeMap<String, Decimal>) -> Result<Self, FxError> {
        let base = normalize_code(base);
        let mut clean = BTreeMap::new();
        for (code, rate) in rates {
            let code = normalize_code(&code);
            if rate <= Decimal::ZERO {
                return Err(FxError::InvalidRate { currency: code });
            }
            clean.insert(code, rate);
        }
        clean.entry(base.clone()).or_insert(Decimal::ONE);
        Ok(Self {
            base,
            rates: clean,
            rejected: Vec::new(),
        })
    }

    /// Build from the collaborator's float mapping. Non-finite or non-positive
    /// entries are dropped and recorded in [`RateTable::rejected`], so a later
    /// lookup of that code fails with `RateUnavailable`.
    pub fn from_f64_map<I, K>(base: &str, raw: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let base = normalize_code(base);
        let mut rates = BTreeMap::new();
        let mut rejected = Vec::new();
        for (code, value) in raw {
            let code = normalize_code(code.as_ref());
            let parsed = if value.is_finite() && value > 0.0 {
                Decimal::try_from(value).ok().filter(|d| *d > Decimal::ZERO)
            } else {
                None
            };
            match parsed {
                Some(rate) => {
                    rates.insert(code, rate);
                }
                None => {
                    tracing::warn!(currency = %code, value, "dropping invalid exchange rate");
                    rejected.push(code);
                }
            }
        }
        rejected.sort();
        if !rejected.contains(&base) {
            rates.entry(base.clone()).or_insert(Decimal::ONE);
        }
        Self {
            base,
            rates,
            rejected,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn rate(&self, code: &str) -> Result<Decimal, FxError> {
        let code = normalize_code(code);
        self.rates
            .get(&code)
            .copied()
            .ok_or_else(|| FxError::rate_unavailable(&code))
    }

    /// Units of `to` per one unit of `from`: `rate[to] / rate[from]`.
    pub fn pairwise_rate(&self, from: &str, to: &str) -> Result<Decimal, FxError> {
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        to_rate
            .checked_div(from_rate)
            .ok_or_else(|| FxError::ConversionFailed(format!("rate {from}->{to} out of range")))
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{RateTable, DEFAULT_CURRENCY};
use crate::error::FxError;
use crate::utils::http_client;
use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where a currency change gets its rates from.
pub trait RateSource {
    fn fetch_rates(&self) -> Result<RateTable, FxError>;
}

/// USD-based rates used when the rate service cannot be reached.
pub const FALLBACK_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("AED", 3.6725),
    ("AUD", 1.52),
    ("BAM", 1.72),
    ("BGN", 1.72),
    ("BRL", 5.45),
    ("CAD", 1.37),
    ("CHF", 0.80),
    ("CNY", 7.12),
    ("CZK", 21.2),
    ("DKK", 6.57),
    ("EUR", 0.88),
    ("GBP", 0.75),
    ("HKD", 7.80),
    ("HUF", 345.0),
    ("IDR", 16300.0),
    ("INR", 87.5),
    ("JPY", 147.0),
    ("KRW", 1390.0),
    ("KWD", 0.305),
    ("MKD", 54.2),
    ("MXN", 18.6),
    ("NOK", 10.1),
    ("NZD", 1.70),
    ("PLN", 3.73),
    ("RON", 4.44),
    ("RSD", 103.0),
    ("RUB", 80.0),
    ("SEK", 9.55),
    ("SGD", 1.29),
    ("THB", 32.4),
    ("TRY", 41.0),
    ("UAH", 41.5),
    ("ZAR", 17.7),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct StaticRateSource;

impl RateSource for StaticRateSource {
    fn fetch_rates(&self) -> Result<RateTable, FxError> {
        Ok(RateTable::from_f64_map(
            DEFAULT_CURRENCY,
            FALLBACK_RATES.iter().map(|(c, r)| (*c, *r)),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    conversion_rates: HashMap<String, f64>,
    #[serde(default)]
    base_code: Option<String>,
}

pub struct HttpRateSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpRateSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }
}

impl RateSource for HttpRateSource {
    fn fetch_rates(&self) -> Result<RateTable, FxError> {
        let url = format!("{}/exchange-rates", self.base_url);
        let fetch_err = |e: reqwest::Error| FxError::Fetch(e.to_string());
        let resp = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;
        let body: RatesResponse = resp.json().map_err(fetch_err)?;
        let base = body.base_code.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        Ok(RateTable::from_f64_map(&base, body.conversion_rates))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RatesFile {
    Wrapped(RatesResponse),
    Plain(HashMap<String, f64>),
}

/// Reads `{ "EUR": 0.9, ... }` (or the service's `conversion_rates` wrapper)
/// from a JSON file. Plain maps are taken as USD-based.
#[derive(Debug, Clone)]
pub struct FileRateSource {
    path: PathBuf,
}

impl FileRateSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RateSource for FileRateSource {
    fn fetch_rates(&self) -> Result<RateTable, FxError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| FxError::Fetch(format!("{}: {}", self.path.display(), e)))?;
        let parsed: RatesFile = serde_json::from_str(&raw)
            .map_err(|e| FxError::Fetch(format!("{}: {}", self.path.display(), e)))?;
        let table = match parsed {
            RatesFile::Wrapped(r) => RateTable::from_f64_map(
                r.base_code.as_deref().unwrap_or(DEFAULT_CURRENCY),
                r.conversion_rates,
            ),
            RatesFile::Plain(m) => RateTable::from_f64_map(DEFAULT_CURRENCY, m),
        };
        if table.is_empty() {
            return Err(FxError::Fetch(format!(
                "{}: no usable rates",
                self.path.display()
            )));
        }
        Ok(table)
    }
}

/// Primary source with a second source behind it; the fallback's table is
/// returned as-is when the primary fails.
pub struct FallbackRateSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P: RateSource, F: RateSource> FallbackRateSource<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: RateSource, F: RateSource> RateSource for FallbackRateSource<P, F> {
    fn fetch_rates(&self) -> Result<RateTable, FxError> {
        match self.primary.fetch_rates() {
            Ok(table) => Ok(table),
            Err(e) => {
                tracing::warn!(error = %e, "rate service failed, using fallback rates");
                self.fallback.fetch_rates()
            }
        }
    }
}

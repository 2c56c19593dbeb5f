// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{normalize_code, RateTable, DEFAULT_CURRENCY};
use crate::error::{FxError, RecordError};
use crate::fx::{convert, migrate};
use crate::ledger::Ledger;
use crate::models::Transaction;
use crate::money::Money;
use crate::rates::RateSource;
use crate::receipt::ParsedReceipt;

/// Owns the ledger and the display currency for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    ledger: Ledger,
    currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyChange {
    pub from: String,
    pub to: String,
    pub transactions: usize,
    pub fallback_used: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Ledger::new(), DEFAULT_CURRENCY)
    }
}

impl App {
    pub fn new(ledger: Ledger, currency: &str) -> Self {
        Self {
            ledger,
            currency: normalize_code(currency),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Fetch rates, then convert everything. The fetch happens before any
    /// mutation; on any error the ledger and currency are left as they were.
    pub fn change_currency(
        &mut self,
        new_currency: &str,
        source: &dyn RateSource,
    ) -> Result<CurrencyChange, FxError> {
        let new_currency = normalize_code(new_currency);
        if new_currency == self.currency {
            return Ok(self.unchanged());
        }
        let rates = source.fetch_rates()?;
        self.change_currency_with(&new_currency, &rates)
    }

    pub fn change_currency_with(
        &mut self,
        new_currency: &str,
        rates: &RateTable,
    ) -> Result<CurrencyChange, FxError> {
        let new_currency = normalize_code(new_currency);
        if new_currency == self.currency {
            return Ok(self.unchanged());
        }
        let migration = migrate(&self.ledger.financial_data(), &self.currency, &new_currency, rates)?;
        let count = migration.data.transactions.len();
        self.ledger.apply_migration(migration.data);

        let change = CurrencyChange {
            from: std::mem::replace(&mut self.currency, new_currency),
            to: self.currency.clone(),
            transactions: count,
            fallback_used: migration.fallback_used,
        };
        tracing::info!(
            from = %change.from,
            to = %change.to,
            transactions = count,
            fallback = change.fallback_used,
            "currency migrated"
        );
        Ok(change)
    }

    fn unchanged(&self) -> CurrencyChange {
        CurrencyChange {
            from: self.currency.clone(),
            to: self.currency.clone(),
            transactions: self.ledger.transactions().len(),
            fallback_used: false,
        }
    }

    /// Record a scanned receipt as an expense in the display currency.
    /// `rates` is only consulted when the receipt is in another currency.
    pub fn record_receipt(
        &mut self,
        receipt: &ParsedReceipt,
        category: &str,
        month: u32,
        year: i32,
        rates: Option<&RateTable>,
    ) -> Result<Transaction, RecordError> {
        let total = Money::from_f64(receipt.total);
        let amount = if normalize_code(&receipt.currency) == self.currency {
            total
        } else {
            let rates = rates.ok_or_else(|| FxError::rate_unavailable(&receipt.currency))?;
            convert(&total, &receipt.currency, &self.currency, rates)?.amount
        };
        Ok(self.ledger.add_expense(amount, category, month, year)?)
    }

    pub fn reset_all(&mut self) {
        self.ledger.reset_all();
        self.currency = DEFAULT_CURRENCY.to_string();
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Amount overflows the fixed-point range")]
    Overflow,

    #[error("Invalid amount '{0}'")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    #[error("Exchange rate not available for {currency}")]
    RateUnavailable { currency: String },

    #[error("Invalid exchange rate for {currency}")]
    InvalidRate { currency: String },

    #[error("Currency conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Failed to fetch exchange rates: {0}")]
    Fetch(String),
}

impl FxError {
    pub fn rate_unavailable(currency: &str) -> Self {
        FxError::RateUnavailable {
            currency: currency.to_string(),
        }
    }
}

/// Why a ledger intent was refused. The ledger is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("Amount must be a finite number greater than zero")]
    InvalidAmount,

    #[error("Category '{0}' does not exist")]
    UnknownCategory(String),

    #[error("Month index {0} is out of range (expected 0-11)")]
    InvalidMonth(u32),

    #[error("Year {0} is out of range (expected 0-9999)")]
    InvalidYear(i32),

    #[error("Amount overflows the ledger range")]
    Overflow,
}

impl From<MoneyError> for Rejected {
    fn from(_: MoneyError) -> Self {
        Rejected::Overflow
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    #[error("Receipt service rejected the scan: {0}")]
    Service(String),

    #[error("Receipt service unreachable: {0}")]
    Transport(String),
}

/// Failure while turning a parsed receipt into an expense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error(transparent)]
    Fx(#[from] FxError),

    #[error(transparent)]
    Rejected(#[from] Rejected),
}

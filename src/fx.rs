// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{normalize_code, Currency, RateTable};
use crate::error::FxError;
use crate::models::{FinancialData, Transaction};
use crate::money::{Money, MAX_SCALE};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Extra digits kept on the source amount beyond its currency exponent.
pub const AMOUNT_PRECISION_MARGIN: u32 = 8;
/// Fixed scale the pairwise rate is held at.
pub const RATE_SCALE: u32 = 16;
/// Digits kept by the float fallback.
pub const FALLBACK_SCALE: u32 = 8;

/// How far a converted total may sit from the sum of its independently
/// converted parts after `migrations` currency changes: one unit in the
/// [`FALLBACK_SCALE`]th decimal per part, plus the same fraction of the
/// gross amount involved. Zero when nothing was ever migrated.
pub fn migration_tolerance(migrations: u32, parts: usize, gross: &Money) -> Money {
    if migrations == 0 {
        return Money::ZERO;
    }
    let per_part = 10i128.pow(MAX_SCALE - FALLBACK_SCALE);
    let relative = gross
        .abs()
        .and_then(|g| g.rescale(MAX_SCALE - FALLBACK_SCALE))
        .map(|g| g.minor_units())
        .unwrap_or(i128::MAX);
    let units = (parts as i128)
        .saturating_add(1)
        .saturating_mul(per_part)
        .saturating_add(relative)
        .saturating_mul(migrations as i128);
    Money::new(units, MAX_SCALE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub amount: Money,
    /// Set when the float fallback produced `amount`.
    pub fallback_used: bool,
}

/// Convert `amount` from one currency to another.
///
/// The result keeps full precision (up to [`MAX_SCALE`] digits); it is never
/// rounded to the target currency's display exponent here. A missing rate for
/// either side is an error, never a guess.
pub fn convert(
    amount: &Money,
    from: &str,
    to: &str,
    rates: &RateTable,
) -> Result<Conversion, FxError> {
    let from = normalize_code(from);
    let to = normalize_code(to);
    if from == to {
        return Ok(Conversion {
            amount: *amount,
            fallback_used: false,
        });
    }

    let from_rate = rates.rate(&from)?;
    let to_rate = rates.rate(&to)?;

    match (Currency::lookup(&from), Currency::lookup(&to)) {
        (Some(source), Some(_)) => match convert_fixed_point(amount, &source, &to, rates) {
            Ok(converted) => {
                return Ok(Conversion {
                    amount: converted,
                    fallback_used: false,
                });
            }
            Err(e) => {
                tracing::warn!(from = %from, to = %to, error = %e, "fixed-point conversion failed, using float fallback");
            }
        },
        _ => {
            tracing::warn!(from = %from, to = %to, "no currency metadata, using float fallback");
        }
    }

    convert_fallback(amount, from_rate, to_rate)
}

fn convert_fixed_point(
    amount: &Money,
    source: &Currency,
    to: &str,
    rates: &RateTable,
) -> Result<Money, FxError> {
    let direct = rates.pairwise_rate(&source.code, to)?;
    let amount_scale = source.exponent + AMOUNT_PRECISION_MARGIN;
    let overflow = || FxError::ConversionFailed(format!("{} {} is out of range", amount, source.code));

    let scaled_amount = amount.rescale(amount_scale).map_err(|_| overflow())?;
    let scaled_rate = Money::from_decimal(direct)
        .rescale(RATE_SCALE)
        .map_err(|_| overflow())?;
    let units = scaled_amount
        .minor_units()
        .checked_mul(scaled_rate.minor_units())
        .ok_or_else(overflow)?;

    Ok(Money::new(units, amount_scale + RATE_SCALE)
        .round_dp(MAX_SCALE)
        .normalized())
}

fn convert_fallback(amount: &Money, from_rate: Decimal, to_rate: Decimal) -> Result<Conversion, FxError> {
    let failed = || FxError::ConversionFailed(format!("fallback conversion of {} failed", amount));
    let from_f = from_rate.to_f64().ok_or_else(failed)?;
    let to_f = to_rate.to_f64().ok_or_else(failed)?;

    let value = amount.to_f64() / from_f * to_f;
    if !value.is_finite() {
        return Err(failed());
    }
    let rounded = Decimal::try_from(value)
        .map_err(|_| failed())?
        .round_dp(FALLBACK_SCALE);
    Ok(Conversion {
        amount: Money::from_decimal(rounded).normalized(),
        fallback_used: true,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub data: FinancialData,
    pub fallback_used: bool,
}

/// Re-express every monetary value of `data` in `new` currency.
///
/// Balance, each month's income, each month/category expense and each
/// transaction amount are converted independently with the same rate. Any
/// single failure aborts the whole migration and nothing is returned, so the
/// caller keeps its old values.
pub fn migrate(
    data: &FinancialData,
    old: &str,
    new: &str,
    rates: &RateTable,
) -> Result<Migration, FxError> {
    if normalize_code(old) == normalize_code(new) {
        return Ok(Migration {
            data: data.clone(),
            fallback_used: false,
        });
    }

    let mut fallback_used = false;
    let mut conv = |m: &Money| -> Result<Money, FxError> {
        let c = convert(m, old, new, rates)?;
        fallback_used |= c.fallback_used;
        Ok(c.amount)
    };

    let total_balance = conv(&data.total_balance)?;

    let mut monthly_data = BTreeMap::new();
    for (key, month) in &data.monthly_data {
        let mut converted = month.clone();
        converted.income = conv(&month.income)?;
        for (category, amount) in &month.expenses {
            converted.expenses.insert(category.clone(), conv(amount)?);
        }
        monthly_data.insert(key.clone(), converted);
    }

    let transactions = data
        .transactions
        .iter()
        .map(|t| {
            Ok(Transaction {
                amount: conv(&t.amount)?,
                ..t.clone()
            })
        })
        .collect::<Result<Vec<_>, FxError>>()?;

    Ok(Migration {
        data: FinancialData {
            total_balance,
            monthly_data,
            transactions,
        },
        fallback_used,
    })
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::MoneyError;
use crate::ledger::Ledger;
use crate::models::{MonthKey, Transaction, TransactionKind};
use crate::money::Money;
use chrono::{DateTime, Months, Utc};
use serde::Serialize;
use std::str::FromStr;

pub const UNKNOWN_CATEGORY: &str = "Unknown category";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Months(u32),
    All,
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Period::All),
            n => n
                .parse::<u32>()
                .ok()
                .filter(|m| *m > 0)
                .map(Period::Months)
                .ok_or_else(|| format!("Invalid period '{}', expected a month count or 'all'", s)),
        }
    }
}

fn accumulate(acc: &Money, m: &Money) -> Result<Money, MoneyError> {
    Money::add(acc, m, Money::common_scale(acc, m))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub income: Money,
    pub expenses: Money,
    pub net: Money,
    pub filtered_count: usize,
    pub total_count: usize,
}

/// Income and expense totals for transactions dated within the last
/// `period` months up to `now`. Future-dated transactions are left out.
pub fn period_totals(
    transactions: &[Transaction],
    period: Period,
    now: DateTime<Utc>,
) -> Result<PeriodTotals, MoneyError> {
    let cutoff = match period {
        Period::All => DateTime::<Utc>::MIN_UTC,
        Period::Months(n) => now
            .checked_sub_months(Months::new(n))
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
    };

    let mut income = Money::ZERO;
    let mut expenses = Money::ZERO;
    let mut filtered_count = 0;
    for tx in transactions
        .iter()
        .filter(|t| t.date >= cutoff && t.date <= now)
    {
        filtered_count += 1;
        match tx.kind {
            TransactionKind::Income => income = accumulate(&income, &tx.amount)?,
            TransactionKind::Expense => expenses = accumulate(&expenses, &tx.amount)?,
        }
    }
    let net = Money::subtract(&income, &expenses, Money::common_scale(&income, &expenses))?;
    Ok(PeriodTotals {
        income,
        expenses,
        net,
        filtered_count,
        total_count: transactions.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAmount {
    pub id: String,
    pub name: String,
    pub known: bool,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub month_key: String,
    pub income: Money,
    pub expenses_total: Money,
    pub total_balance: Money,
    pub expenses_by_category: Vec<CategoryAmount>,
}

/// Display name for a category id, tolerating deleted categories.
pub fn category_name(ledger: &Ledger, id: &str) -> (String, bool) {
    match ledger.category(id) {
        Some(c) => (c.name.clone(), true),
        None => (UNKNOWN_CATEGORY.to_string(), false),
    }
}

/// Every current category plus any orphaned ids that still carry an amount
/// in this month.
pub fn month_summary(ledger: &Ledger, key: &MonthKey) -> Result<MonthSummary, MoneyError> {
    let month = ledger.month(key);
    let amount_for = |id: &str| {
        month
            .and_then(|m| m.expenses.get(id).copied())
            .unwrap_or(Money::ZERO)
    };

    let mut rows: Vec<CategoryAmount> = ledger
        .categories()
        .iter()
        .map(|c| CategoryAmount {
            id: c.id.clone(),
            name: c.name.clone(),
            known: true,
            amount: amount_for(&c.id),
        })
        .collect();
    if let Some(m) = month {
        for (id, amount) in &m.expenses {
            if !ledger.category_exists(id) && !amount.is_zero() {
                let (name, known) = category_name(ledger, id);
                rows.push(CategoryAmount {
                    id: id.clone(),
                    name,
                    known,
                    amount: *amount,
                });
            }
        }
    }

    let income = month.map(|m| m.income).unwrap_or(Money::ZERO);
    let expenses_total = match month {
        Some(m) => m
            .expenses
            .values()
            .try_fold(Money::ZERO, |acc, v| accumulate(&acc, v))?,
        None => Money::ZERO,
    };
    Ok(MonthSummary {
        month_key: key.to_string(),
        income,
        expenses_total,
        total_balance: ledger.total_balance(),
        expenses_by_category: rows,
    })
}

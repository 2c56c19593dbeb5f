// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Rejected;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// Calendar month a transaction belongs to, rendered as `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32, // 0-11
}

impl MonthKey {
    /// `month` is zero-based (0 = January); `year` must fit in four digits.
    pub fn new(month: u32, year: i32) -> Result<Self, Rejected> {
        if month > 11 {
            return Err(Rejected::InvalidMonth(month));
        }
        if !YEAR_RANGE.contains(&year) {
            return Err(Rejected::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
        if y.len() != 4 || !y.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid year in '{}'", s));
        }
        let year: i32 = y
            .parse()
            .map_err(|_| format!("Invalid year in '{}'", s))?;
        let month: u32 = m
            .parse()
            .map_err(|_| format!("Invalid month in '{}'", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid month number {} in '{}'", month, s));
        }
        Ok(Self {
            year,
            month: month - 1,
        })
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MonthKey> for String {
    fn from(k: MonthKey) -> Self {
        k.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("Unknown transaction type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>, // set iff kind == Expense
    pub date: DateTime<Utc>,
    pub month: u32,
    pub year: i32,
    pub month_key: MonthKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String, // translation key for built-ins, free text for custom
    pub icon: String,
    pub color: String,
    #[serde(default, rename = "isBuiltin")]
    pub builtin: bool,
}

pub const BUILTIN_CATEGORIES: &[(&str, &str, &str)] = &[
    ("categoryEssentials", "shield-check", "#38bdf8"),
    ("categoryFood", "silverware-fork-knife", "#f97316"),
    ("categoryTransport", "transit-connection-variant", "#22c55e"),
    ("categoryEntertainment", "controller-classic", "#a855f7"),
    ("categorySavings", "piggy-bank", "#facc15"),
];

pub fn default_categories() -> Vec<Category> {
    BUILTIN_CATEGORIES
        .iter()
        .map(|(key, icon, color)| Category {
            id: key.to_string(),
            name: key.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            builtin: true,
        })
        .collect()
}

/// Per-month cache: income total and expense totals keyed by category id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFinance {
    pub income: Money,
    pub expenses: BTreeMap<String, Money>,
}

impl MonthlyFinance {
    /// A fresh month with a zero entry for every built-in category.
    pub fn empty() -> Self {
        Self {
            income: Money::ZERO,
            expenses: BUILTIN_CATEGORIES
                .iter()
                .map(|(key, _, _)| (key.to_string(), Money::ZERO))
                .collect(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.income.is_zero() && self.expenses.values().all(Money::is_zero)
    }
}

impl Default for MonthlyFinance {
    fn default() -> Self {
        Self::empty()
    }
}

/// The monetary part of the ledger: what a currency change rewrites.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialData {
    pub total_balance: Money,
    pub monthly_data: BTreeMap<MonthKey, MonthlyFinance>,
    pub transactions: Vec<Transaction>,
}

/// Complete durable state, in the shape written to JSON exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSnapshot {
    pub total_balance: Money,
    pub monthly_data: BTreeMap<MonthKey, MonthlyFinance>,
    pub custom_categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    /// Currency changes applied since the last reset.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub migrations: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

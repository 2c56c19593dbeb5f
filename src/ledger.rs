// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction list with incrementally maintained balance and monthly caches.
//!
//! Every mutation computes all of its new values first and only then writes
//! them back, so a reader never sees the balance moved without the matching
//! month entry (or the other way round). Arithmetic runs at the larger scale
//! of the two operands, which keeps add and revert exact inverses.
//!
//! A currency migration converts every cached value on its own, so after one
//! the caches may sit a conversion epsilon away from their recomputed sums;
//! [`Ledger::audit`] only tolerates that once a migration has happened.

use crate::error::Rejected;
use crate::fx::migration_tolerance;
use crate::models::{
    default_categories, Category, FinanceSnapshot, FinancialData, MonthKey, MonthlyFinance,
    Transaction, TransactionKind,
};
use crate::money::Money;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    total_balance: Money,
    monthly_data: BTreeMap<MonthKey, MonthlyFinance>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>, // newest first
    migrations: u32,
}

/// A cached aggregate that disagrees with the transaction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub scope: String,
    pub cached: Money,
    pub expected: Money,
}

fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

fn plus(a: &Money, b: &Money) -> Result<Money, Rejected> {
    Ok(Money::add(a, b, Money::common_scale(a, b))?)
}

fn minus(a: &Money, b: &Money) -> Result<Money, Rejected> {
    Ok(Money::subtract(a, b, Money::common_scale(a, b))?)
}

fn validate_amount(amount: &Money) -> Result<(), Rejected> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(Rejected::InvalidAmount)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            total_balance: Money::ZERO,
            monthly_data: BTreeMap::new(),
            categories: default_categories(),
            transactions: Vec::new(),
            migrations: 0,
        }
    }

    pub fn from_snapshot(snapshot: FinanceSnapshot) -> Self {
        Self {
            total_balance: snapshot.total_balance,
            monthly_data: snapshot.monthly_data,
            categories: snapshot.custom_categories,
            transactions: snapshot.transactions,
            migrations: snapshot.migrations,
        }
    }

    pub fn snapshot(&self) -> FinanceSnapshot {
        FinanceSnapshot {
            total_balance: self.total_balance,
            monthly_data: self.monthly_data.clone(),
            custom_categories: self.categories.clone(),
            transactions: self.transactions.clone(),
            migrations: self.migrations,
        }
    }

    pub fn total_balance(&self) -> Money {
        self.total_balance
    }

    pub fn monthly_data(&self) -> &BTreeMap<MonthKey, MonthlyFinance> {
        &self.monthly_data
    }

    pub fn month(&self, key: &MonthKey) -> Option<&MonthlyFinance> {
        self.monthly_data.get(key)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Number of currency migrations applied since the last reset.
    pub fn migrations(&self) -> u32 {
        self.migrations
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_exists(&self, id: &str) -> bool {
        self.category(id).is_some()
    }

    pub fn financial_data(&self) -> FinancialData {
        FinancialData {
            total_balance: self.total_balance,
            monthly_data: self.monthly_data.clone(),
            transactions: self.transactions.clone(),
        }
    }

    pub fn add_income(&mut self, amount: Money, month: u32, year: i32) -> Result<Transaction, Rejected> {
        self.add_income_at(amount, month, year, Utc::now())
    }

    pub fn add_income_at(
        &mut self,
        amount: Money,
        month: u32,
        year: i32,
        date: DateTime<Utc>,
    ) -> Result<Transaction, Rejected> {
        validate_amount(&amount)?;
        let key = MonthKey::new(month, year)?;
        let mut month_data = self.monthly_data.get(&key).cloned().unwrap_or_default();

        let balance = plus(&self.total_balance, &amount)?;
        month_data.income = plus(&month_data.income, &amount)?;

        let tx = Transaction {
            id: generate_id("income"),
            kind: TransactionKind::Income,
            amount,
            category: None,
            date,
            month,
            year,
            month_key: key.clone(),
        };
        self.commit(balance, key, month_data);
        self.transactions.insert(0, tx.clone());
        tracing::debug!(id = %tx.id, month = %tx.month_key, "income recorded");
        Ok(tx)
    }

    pub fn add_expense(
        &mut self,
        amount: Money,
        category: &str,
        month: u32,
        year: i32,
    ) -> Result<Transaction, Rejected> {
        self.add_expense_at(amount, category, month, year, Utc::now())
    }

    pub fn add_expense_at(
        &mut self,
        amount: Money,
        category: &str,
        month: u32,
        year: i32,
        date: DateTime<Utc>,
    ) -> Result<Transaction, Rejected> {
        validate_amount(&amount)?;
        if !self.category_exists(category) {
            return Err(Rejected::UnknownCategory(category.to_string()));
        }
        let key = MonthKey::new(month, year)?;
        let mut month_data = self.monthly_data.get(&key).cloned().unwrap_or_default();

        let balance = minus(&self.total_balance, &amount)?;
        let current = month_data
            .expenses
            .get(category)
            .copied()
            .unwrap_or(Money::ZERO);
        let updated = plus(&current, &amount)?;
        month_data.expenses.insert(category.to_string(), updated);

        let tx = Transaction {
            id: generate_id("expense"),
            kind: TransactionKind::Expense,
            amount,
            category: Some(category.to_string()),
            date,
            month,
            year,
            month_key: key.clone(),
        };
        self.commit(balance, key, month_data);
        self.transactions.insert(0, tx.clone());
        tracing::debug!(id = %tx.id, month = %tx.month_key, category, "expense recorded");
        Ok(tx)
    }

    /// Undo exactly what the matching add did and drop the transaction.
    /// Returns the removed transaction, or `None` when the id is unknown.
    /// The category of an expense does not need to exist any more.
    pub fn revert_transaction(&mut self, id: &str) -> Option<Transaction> {
        let pos = self.transactions.iter().position(|t| t.id == id)?;
        let tx = &self.transactions[pos];
        let key = tx.month_key.clone();
        let mut month_data = self.monthly_data.get(&key).cloned().unwrap_or_default();

        let reversed = match tx.kind {
            TransactionKind::Income => minus(&self.total_balance, &tx.amount).and_then(|b| {
                month_data.income = minus(&month_data.income, &tx.amount)?;
                Ok(b)
            }),
            TransactionKind::Expense => {
                let Some(category) = tx.category.as_deref() else {
                    tracing::warn!(id, "expense has no category, cannot revert");
                    return None;
                };
                plus(&self.total_balance, &tx.amount).and_then(|b| {
                    let current = month_data
                        .expenses
                        .get(category)
                        .copied()
                        .unwrap_or(Money::ZERO);
                    month_data
                        .expenses
                        .insert(category.to_string(), minus(&current, &tx.amount)?);
                    Ok(b)
                })
            }
        };
        let balance = match reversed {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(id, error = %e, "revert rejected");
                return None;
            }
        };

        self.commit(balance, key, month_data);
        let removed = self.transactions.remove(pos);
        tracing::debug!(id, month = %removed.month_key, "transaction reverted");
        Some(removed)
    }

    fn commit(&mut self, balance: Money, key: MonthKey, month_data: MonthlyFinance) {
        self.total_balance = balance;
        self.monthly_data.insert(key, month_data);
    }

    /// Wholesale replacement used after a currency migration. Consistency of
    /// the supplied values is the caller's responsibility.
    pub fn update_financial_data(
        &mut self,
        total_balance: Money,
        monthly_data: BTreeMap<MonthKey, MonthlyFinance>,
        transactions: Option<Vec<Transaction>>,
    ) {
        self.total_balance = total_balance;
        self.monthly_data = monthly_data;
        if let Some(transactions) = transactions {
            self.transactions = transactions;
        }
    }

    /// Install the output of a currency migration.
    pub fn apply_migration(&mut self, data: FinancialData) {
        self.update_financial_data(data.total_balance, data.monthly_data, Some(data.transactions));
        self.migrations = self.migrations.saturating_add(1);
    }

    pub fn reset_all(&mut self) {
        *self = Self::new();
    }

    pub fn add_category(&mut self, name: &str, icon: &str, color: &str) -> Category {
        let category = Category {
            id: generate_id("custom"),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            builtin: false,
        };
        self.categories.push(category.clone());
        category
    }

    pub fn update_category(&mut self, id: &str, name: &str, icon: &str, color: &str) -> bool {
        match self.categories.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.name = name.to_string();
                c.icon = icon.to_string();
                c.color = color.to_string();
                true
            }
            None => false,
        }
    }

    /// Removes the category only; transactions and month entries that
    /// reference it stay as they are.
    pub fn delete_category(&mut self, id: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        self.categories.len() != before
    }

    /// Rebuild balance and month caches from the transaction list alone.
    pub fn recompute(&self) -> Result<(Money, BTreeMap<MonthKey, MonthlyFinance>), Rejected> {
        let mut balance = Money::ZERO;
        let mut months: BTreeMap<MonthKey, MonthlyFinance> = BTreeMap::new();
        for tx in &self.transactions {
            let entry = months.entry(tx.month_key.clone()).or_default();
            match tx.kind {
                TransactionKind::Income => {
                    balance = plus(&balance, &tx.amount)?;
                    entry.income = plus(&entry.income, &tx.amount)?;
                }
                TransactionKind::Expense => {
                    balance = minus(&balance, &tx.amount)?;
                    let category = tx.category.clone().unwrap_or_default();
                    let slot = entry.expenses.entry(category).or_insert(Money::ZERO);
                    *slot = plus(slot, &tx.amount)?;
                }
            }
        }
        Ok((balance, months))
    }

    /// Compare every cached aggregate with its value recomputed from the
    /// transaction list. Missing entries count as zero on both sides. Until
    /// the ledger has been migrated the comparison is exact; afterwards a
    /// difference within [`migration_tolerance`] is not drift.
    pub fn audit(&self) -> Result<Vec<Drift>, Rejected> {
        let (balance, months) = self.recompute()?;

        let mut parts: BTreeMap<String, usize> = BTreeMap::new();
        let mut gross = Money::ZERO;
        for tx in &self.transactions {
            *parts.entry(scope_of(tx)).or_default() += 1;
            gross = plus(&gross, &tx.amount)?;
        }

        let mut drift = Vec::new();
        if !self.within_tolerance(&self.total_balance, &balance, self.transactions.len(), &gross) {
            drift.push(Drift {
                scope: "totalBalance".to_string(),
                cached: self.total_balance,
                expected: balance,
            });
        }

        let empty = MonthlyFinance {
            income: Money::ZERO,
            expenses: BTreeMap::new(),
        };
        let mut keys: Vec<&MonthKey> = self.monthly_data.keys().chain(months.keys()).collect();
        keys.sort();
        keys.dedup();
        for key in keys {
            let cached = self.monthly_data.get(key).unwrap_or(&empty);
            let expected = months.get(key).unwrap_or(&empty);
            let scope = format!("{}/income", key);
            let n = parts.get(&scope).copied().unwrap_or(0);
            if !self.within_tolerance(&cached.income, &expected.income, n, &expected.income) {
                drift.push(Drift {
                    scope,
                    cached: cached.income,
                    expected: expected.income,
                });
            }
            let mut categories: Vec<&String> =
                cached.expenses.keys().chain(expected.expenses.keys()).collect();
            categories.sort();
            categories.dedup();
            for category in categories {
                let c = cached.expenses.get(category).copied().unwrap_or(Money::ZERO);
                let e = expected.expenses.get(category).copied().unwrap_or(Money::ZERO);
                let scope = format!("{}/{}", key, category);
                let n = parts.get(&scope).copied().unwrap_or(0);
                if !self.within_tolerance(&c, &e, n, &e) {
                    drift.push(Drift {
                        scope,
                        cached: c,
                        expected: e,
                    });
                }
            }
        }
        Ok(drift)
    }

    fn within_tolerance(&self, cached: &Money, expected: &Money, parts: usize, gross: &Money) -> bool {
        if self.migrations == 0 {
            return cached == expected;
        }
        let tolerance = migration_tolerance(self.migrations, parts, gross);
        Money::subtract(cached, expected, Money::common_scale(cached, expected))
            .and_then(|d| d.abs())
            .is_ok_and(|d| d <= tolerance)
    }
}

fn scope_of(tx: &Transaction) -> String {
    match tx.kind {
        TransactionKind::Income => format!("{}/income", tx.month_key),
        TransactionKind::Expense => format!(
            "{}/{}",
            tx.month_key,
            tx.category.as_deref().unwrap_or_default()
        ),
    }
}

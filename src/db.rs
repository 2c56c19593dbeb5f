// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::config::db_path_override;
use crate::ledger::Ledger;
use crate::models::{Category, FinanceSnapshot, MonthKey, MonthlyFinance, Transaction};
use crate::money::Money;
use crate::utils::{get_currency, get_setting, set_currency, set_setting};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tallybook", "tallybook"));

pub fn db_path() -> Result<PathBuf> {
    if let Some(path) = db_path_override() {
        return Ok(path);
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tallybook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        position INTEGER PRIMARY KEY,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        icon TEXT NOT NULL,
        color TEXT NOT NULL,
        builtin INTEGER NOT NULL DEFAULT 0
    );

    -- seq 0 is the newest transaction
    CREATE TABLE IF NOT EXISTS transactions(
        seq INTEGER PRIMARY KEY,
        id TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        amount TEXT NOT NULL,
        category TEXT,
        date TEXT NOT NULL,
        month INTEGER NOT NULL,
        year INTEGER NOT NULL,
        month_key TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_month ON transactions(month_key);

    CREATE TABLE IF NOT EXISTS monthly_income(
        month_key TEXT PRIMARY KEY,
        income TEXT NOT NULL
    );

    -- no foreign key: entries outlive deleted categories
    CREATE TABLE IF NOT EXISTS monthly_expenses(
        month_key TEXT NOT NULL,
        category_id TEXT NOT NULL,
        amount TEXT NOT NULL,
        PRIMARY KEY(month_key, category_id)
    );
    "#,
    )?;
    Ok(())
}

fn parse_money(s: &str) -> Result<Money> {
    s.parse::<Money>()
        .with_context(|| format!("Invalid stored amount '{}'", s))
}

fn parse_month_key(s: &str) -> Result<MonthKey> {
    s.parse::<MonthKey>().map_err(|e| anyhow!(e))
}

/// Replace the stored ledger and display currency, all or nothing. Converted
/// amounts are never stored under the old currency code.
pub fn save_app(conn: &mut Connection, app: &App) -> Result<()> {
    let tx = conn.transaction()?;
    write_ledger(&tx, app.ledger())?;
    set_currency(&tx, app.currency())?;
    tx.commit()?;
    Ok(())
}

fn write_ledger(tx: &rusqlite::Transaction<'_>, ledger: &Ledger) -> Result<()> {
    tx.execute_batch(
        "DELETE FROM categories; DELETE FROM transactions;
         DELETE FROM monthly_income; DELETE FROM monthly_expenses;",
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO categories(position, id, name, icon, color, builtin) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (i, c) in ledger.categories().iter().enumerate() {
            stmt.execute(params![i as i64, c.id, c.name, c.icon, c.color, c.builtin])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO transactions(seq, id, type, amount, category, date, month, year, month_key)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for (i, t) in ledger.transactions().iter().enumerate() {
            stmt.execute(params![
                i as i64,
                t.id,
                t.kind.as_str(),
                t.amount.to_string(),
                t.category,
                t.date.to_rfc3339(),
                t.month,
                t.year,
                t.month_key.to_string()
            ])?;
        }

        let mut income_stmt =
            tx.prepare("INSERT INTO monthly_income(month_key, income) VALUES (?1, ?2)")?;
        let mut expense_stmt = tx.prepare(
            "INSERT INTO monthly_expenses(month_key, category_id, amount) VALUES (?1, ?2, ?3)",
        )?;
        for (key, month) in ledger.monthly_data() {
            income_stmt.execute(params![key.to_string(), month.income.to_string()])?;
            for (category, amount) in &month.expenses {
                expense_stmt.execute(params![key.to_string(), category, amount.to_string()])?;
            }
        }
    }
    set_setting(tx, "total_balance", &ledger.total_balance().to_string())?;
    set_setting(tx, "migrations", &ledger.migrations().to_string())?;
    Ok(())
}

/// Load the stored ledger; a database that was never saved yields the
/// empty ledger with the built-in categories.
pub fn load_ledger(conn: &Connection) -> Result<Ledger> {
    let Some(balance) = get_setting(conn, "total_balance")? else {
        return Ok(Ledger::new());
    };
    let total_balance = parse_money(&balance)?;

    let mut stmt = conn
        .prepare("SELECT id, name, icon, color, builtin FROM categories ORDER BY position")?;
    let categories = stmt
        .query_map([], |r| {
            Ok(Category {
                id: r.get(0)?,
                name: r.get(1)?,
                icon: r.get(2)?,
                color: r.get(3)?,
                builtin: r.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = conn.prepare(
        "SELECT id, type, amount, category, date, month, year, month_key FROM transactions ORDER BY seq",
    )?;
    let mut rows = stmt.query([])?;
    let mut transactions = Vec::new();
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let kind: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let date: String = r.get(4)?;
        let month_key: String = r.get(7)?;
        transactions.push(Transaction {
            kind: kind.parse().map_err(|e: String| anyhow!(e))?,
            amount: parse_money(&amount)?,
            category: r.get(3)?,
            date: DateTime::parse_from_rfc3339(&date)
                .with_context(|| format!("Invalid date '{}' on {}", date, id))?
                .with_timezone(&Utc),
            month: r.get(5)?,
            year: r.get(6)?,
            month_key: parse_month_key(&month_key)?,
            id,
        });
    }

    let mut monthly_data: BTreeMap<MonthKey, MonthlyFinance> = BTreeMap::new();
    let mut stmt = conn.prepare("SELECT month_key, income FROM monthly_income")?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let key: String = r.get(0)?;
        let income: String = r.get(1)?;
        monthly_data.insert(
            parse_month_key(&key)?,
            MonthlyFinance {
                income: parse_money(&income)?,
                expenses: BTreeMap::new(),
            },
        );
    }
    let mut stmt = conn.prepare("SELECT month_key, category_id, amount FROM monthly_expenses")?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let key: String = r.get(0)?;
        let category: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let entry = monthly_data
            .entry(parse_month_key(&key)?)
            .or_insert_with(|| MonthlyFinance {
                income: Money::ZERO,
                expenses: BTreeMap::new(),
            });
        entry.expenses.insert(category, parse_money(&amount)?);
    }

    let migrations = match get_setting(conn, "migrations")? {
        Some(n) => n
            .parse::<u32>()
            .with_context(|| format!("Invalid stored migration count '{}'", n))?,
        None => 0,
    };

    Ok(Ledger::from_snapshot(FinanceSnapshot {
        total_balance,
        monthly_data,
        custom_categories: categories,
        transactions,
        migrations,
    }))
}

pub fn load_app(conn: &Connection) -> Result<App> {
    Ok(App::new(load_ledger(conn)?, &get_currency(conn)?))
}


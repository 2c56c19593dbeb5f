// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{display_exponent, normalize_code, DEFAULT_CURRENCY};
use crate::models::MonthKey;
use crate::money::Money;
use anyhow::{Context, Result};
use chrono::Datelike;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

const UA: &str = concat!(
    "tallybook/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/tallybook)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

/// `YYYY-MM` to a month key; `None` means the current month.
pub fn parse_month(s: Option<&String>) -> Result<MonthKey> {
    match s {
        Some(s) => s
            .parse::<MonthKey>()
            .map_err(|e| anyhow::anyhow!(e)),
        None => current_month(),
    }
}

pub fn current_month() -> Result<MonthKey> {
    let today = chrono::Utc::now().date_naive();
    MonthKey::new(today.month0(), today.year()).map_err(Into::into)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_amount(s: &str) -> Result<Money> {
    Ok(Money::from_decimal(parse_decimal(s)?))
}

/// Rounded to the currency's minor unit; only ever used for display.
pub fn fmt_money(m: &Money, ccy: &str) -> String {
    let rounded = m
        .rescale(display_exponent(ccy))
        .unwrap_or(*m);
    format!("{} {}", ccy, rounded)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

// Display currency settings
pub fn get_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "currency")?.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn set_currency(conn: &Connection, ccy: &str) -> Result<()> {
    set_setting(conn, "currency", &normalize_code(ccy))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    m.get_one::<String>(name)
        .with_context(|| format!("Missing argument '{}'", name))
}

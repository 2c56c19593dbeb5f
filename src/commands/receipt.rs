// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::commands::fx::rate_source;
use crate::config::api_base_url;
use crate::currency::normalize_code;
use crate::receipt::{HttpReceiptParser, ParsedReceipt, ReceiptParser};
use crate::utils::{fmt_money, parse_decimal, parse_month, required};
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use rust_decimal::prelude::ToPrimitive;

pub fn handle(conn: &Connection, app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("scan", sub)) => {
            let parser = HttpReceiptParser::new(&api_base_url(conn)?)?;
            let receipt = parser
                .parse_receipt(required(sub, "raw")?)
                .map_err(|e| anyhow!("Receipt scan failed ({})", e.tag()))?;
            record(conn, app, &receipt, sub)?;
        }
        Some(("add", sub)) => {
            let total = parse_decimal(required(sub, "total")?)?
                .to_f64()
                .context("Receipt total out of range")?;
            let receipt = ParsedReceipt {
                total,
                currency: normalize_code(required(sub, "currency")?),
                date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
                vendor: required(sub, "vendor")?.to_string(),
            };
            record(conn, app, &receipt, sub)?;
        }
        _ => {}
    }
    Ok(())
}

fn record(
    conn: &Connection,
    app: &mut App,
    receipt: &ParsedReceipt,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let category = required(sub, "category")?;
    let month = parse_month(sub.get_one::<String>("month"))?;
    let rates = if normalize_code(&receipt.currency) == app.currency() {
        None
    } else {
        Some(rate_source(conn, sub)?.fetch_rates()?)
    };
    let tx = app.record_receipt(receipt, category, month.month(), month.year(), rates.as_ref())?;
    println!(
        "Recorded receipt from '{}' ({} {}) as {} in '{}'",
        receipt.vendor,
        receipt.total,
        receipt.currency,
        fmt_money(&tx.amount, app.currency()),
        category
    );
    Ok(())
}

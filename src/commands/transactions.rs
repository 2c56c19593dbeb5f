// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::category_name;
use crate::app::App;
use crate::ledger::Ledger;
use crate::models::MonthKey;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_month, pretty_table, required};
use anyhow::Result;
use serde::Serialize;

pub fn handle(app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("income", sub)) => income(app, sub)?,
        Some(("expense", sub)) => expense(app, sub)?,
        Some(("list", sub)) => list(app, sub)?,
        Some(("revert", sub)) => revert(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn income(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_amount(required(sub, "amount")?)?;
    let month = parse_month(sub.get_one::<String>("month"))?;
    let tx = app
        .ledger_mut()
        .add_income(amount, month.month(), month.year())?;
    println!(
        "Recorded income {} for {} (id: {})",
        fmt_money(&tx.amount, app.currency()),
        tx.month_key,
        tx.id
    );
    Ok(())
}

fn expense(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_amount(required(sub, "amount")?)?;
    let category = required(sub, "category")?;
    let month = parse_month(sub.get_one::<String>("month"))?;
    let tx = app
        .ledger_mut()
        .add_expense(amount, category, month.month(), month.year())?;
    println!(
        "Recorded expense {} in '{}' for {} (id: {})",
        fmt_money(&tx.amount, app.currency()),
        category,
        tx.month_key,
        tx.id
    );
    Ok(())
}

fn revert(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    match app.ledger_mut().revert_transaction(id) {
        Some(tx) => println!(
            "Reverted {} {} from {}",
            tx.kind.as_str(),
            fmt_money(&tx.amount, app.currency()),
            tx.month_key
        ),
        None => println!("No transaction with id '{}'", id),
    }
    Ok(())
}

fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(app.ledger(), app.currency(), sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.month.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Month", "Type", "Amount", "Category", "Id"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub month: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
}

pub fn query_rows(
    ledger: &Ledger,
    currency: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let month = sub
        .get_one::<String>("month")
        .map(|s| s.parse::<MonthKey>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()?;
    let category = sub.get_one::<String>("category");
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let data = ledger
        .transactions()
        .iter()
        .filter(|t| month.as_ref().is_none_or(|m| &t.month_key == m))
        .filter(|t| category.is_none_or(|c| t.category.as_ref() == Some(c)))
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.format("%Y-%m-%d").to_string(),
            month: t.month_key.to_string(),
            kind: t.kind.as_str().to_string(),
            amount: fmt_money(&t.amount, currency),
            category: t
                .category
                .as_deref()
                .map(|c| category_name(ledger, c).0)
                .unwrap_or_default(),
        })
        .collect();
    Ok(data)
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{month_summary, period_totals, Period};
use crate::app::App;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table, required};
use anyhow::{anyhow, Result};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(app, sub)?,
        Some(("period", sub)) => period(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn month(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let key = parse_month(sub.get_one::<String>("month"))?;
    let summary = month_summary(app.ledger(), &key)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let ccy = app.currency();
    println!("Month {}", summary.month_key);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Balance"],
            vec![vec![
                fmt_money(&summary.income, ccy),
                fmt_money(&summary.expenses_total, ccy),
                fmt_money(&summary.total_balance, ccy),
            ]],
        )
    );
    let rows = summary
        .expenses_by_category
        .iter()
        .map(|c| vec![c.name.clone(), c.id.clone(), fmt_money(&c.amount, ccy)])
        .collect();
    println!("{}", pretty_table(&["Category", "Id", "Spent"], rows));
    Ok(())
}

fn period(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let period: Period = required(sub, "months")?.parse().map_err(|e: String| anyhow!(e))?;
    let totals = period_totals(app.ledger().transactions(), period, chrono::Utc::now())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        return Ok(());
    }
    let ccy = app.currency();
    let label = match period {
        Period::All => "all time".to_string(),
        Period::Months(1) => "last month".to_string(),
        Period::Months(n) => format!("last {} months", n),
    };
    println!(
        "{}",
        pretty_table(
            &["Period", "Income", "Expenses", "Net", "Transactions"],
            vec![vec![
                label,
                fmt_money(&totals.income, ccy),
                fmt_money(&totals.expenses, ccy),
                fmt_money(&totals.net, ccy),
                format!("{}/{}", totals.filtered_count, totals.total_count),
            ]],
        )
    );
    Ok(())
}

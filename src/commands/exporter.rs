// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::utils::required;
use anyhow::{bail, Result};
use serde_json::json;

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshot", sub)) => export_snapshot(app, sub),
        Some(("transactions", sub)) => export_transactions(app, sub),
        _ => Ok(()),
    }
}

fn export_snapshot(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let out = required(sub, "out")?;
    let body = serde_json::to_string_pretty(&app.ledger().snapshot())?;
    std::fs::write(out, body)?;
    println!("Exported ledger snapshot to {}", out);
    Ok(())
}

fn export_transactions(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let ccy = app.currency();
    let txs = app.ledger().transactions();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "date", "month", "type", "amount", "currency", "category",
            ])?;
            for t in txs {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_rfc3339(),
                    t.month_key.to_string(),
                    t.kind.as_str().to_string(),
                    t.amount.to_string(),
                    ccy.to_string(),
                    t.category.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date.to_rfc3339(), "month": t.month_key.to_string(),
                        "type": t.kind.as_str(), "amount": t.amount.to_string(), "currency": ccy,
                        "category": t.category
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

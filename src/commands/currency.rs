// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::commands::fx::rate_source;
use crate::utils::{fmt_money, required};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            println!(
                "Display currency: {} (balance {})",
                app.currency(),
                fmt_money(&app.ledger().total_balance(), app.currency())
            );
        }
        Some(("set", sub)) => {
            let target = required(sub, "currency")?;
            let source = rate_source(conn, sub)?;
            let change = app
                .change_currency(target, source.as_ref())
                .with_context(|| format!("Could not switch to {}; data left in {}", target, app.currency()))?;
            println!(
                "Currency changed {} -> {} ({} transactions converted)",
                change.from, change.to, change.transactions
            );
            if change.fallback_used {
                println!("Some amounts were converted with reduced precision.");
            }
        }
        _ => {}
    }
    Ok(())
}

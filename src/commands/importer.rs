// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::ledger::Ledger;
use crate::models::FinanceSnapshot;
use crate::utils::required;
use anyhow::{bail, Context, Result};
use std::path::Path;

pub fn handle(app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshot", sub)) => {
            let file = required(sub, "file")?;
            let ledger = read_snapshot(file)?;
            let count = ledger.transactions().len();
            let currency = app.currency().to_string();
            *app = App::new(ledger, &currency);
            println!("Imported {} transactions from {}", count, file);
        }
        _ => {}
    }
    Ok(())
}

/// Parse a snapshot and refuse it if its caches disagree with its
/// transactions.
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Ledger> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Read snapshot {}", path.display()))?;
    let snapshot: FinanceSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Parse snapshot {}", path.display()))?;
    let ledger = Ledger::from_snapshot(snapshot);
    let drift = ledger.audit()?;
    if let Some(first) = drift.first() {
        bail!(
            "Snapshot is inconsistent: {} is {} but transactions sum to {} ({} issue(s))",
            first.scope,
            first.cached,
            first.expected,
            drift.len()
        );
    }
    Ok(ledger)
}

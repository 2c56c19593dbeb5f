// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(app: &App) -> Result<()> {
    let ledger = app.ledger();
    let mut rows = Vec::new();

    // 1) Cached totals that drifted from the transaction list
    for d in ledger.audit()? {
        rows.push(vec![
            "aggregate_drift".into(),
            format!("{}: cached {} expected {}", d.scope, d.cached, d.expected),
        ]);
    }

    // 2) Expenses pointing at deleted categories (tolerated, reported only)
    for t in ledger.transactions() {
        if let Some(c) = &t.category {
            if !ledger.category_exists(c) {
                rows.push(vec!["orphaned_category".into(), format!("{} {}", t.id, c)]);
            }
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

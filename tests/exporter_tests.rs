// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use serde_json::json;
use tallybook::app::App;
use tallybook::commands::{exporter, importer};
use tallybook::ledger::Ledger;
use tallybook::{cli, money::Money};
use tempfile::tempdir;

fn sample_app() -> App {
    let mut ledger = Ledger::new();
    let date = Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap();
    ledger
        .add_expense_at("12.34".parse().unwrap(), "categoryFood", 0, 2025, date)
        .unwrap();
    App::new(ledger, "usd")
}

fn run_export(app: &App, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tallybook", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(app, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let app = sample_app();
    let id = app.ledger().transactions()[0].id.clone();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&app, &["transactions", "--format", "json", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": id,
                "date": "2025-01-02T09:30:00+00:00",
                "month": "2025-01",
                "type": "expense",
                "amount": "12.34",
                "currency": "USD",
                "category": "categoryFood"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv_by_default() {
    let app = sample_app();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&app, &["transactions", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["id", "date", "month", "type", "amount", "currency", "category"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][4], "12.34");
    assert_eq!(&records[0][6], "categoryFood");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let app = sample_app();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(run_export(&app, &["transactions", "--format", "xml", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}

#[test]
fn snapshot_export_imports_back() {
    let mut app = sample_app();
    app.ledger_mut()
        .add_income(Money::new(50_000, 2), 0, 2025)
        .unwrap();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("snapshot.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&app, &["snapshot", "--out", &out_str]).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(raw["totalBalance"], json!("487.66"));
    assert_eq!(raw["monthlyData"]["2025-01"]["income"], json!("500.00"));
    assert_eq!(raw["transactions"][0]["type"], json!("income"));

    let imported = importer::read_snapshot(&out_path).unwrap();
    assert_eq!(&imported, app.ledger());
}

#[test]
fn inconsistent_snapshot_is_refused() {
    let app = sample_app();
    let mut snapshot = serde_json::to_value(app.ledger().snapshot()).unwrap();
    snapshot["totalBalance"] = json!("1000.00");
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

    let err = importer::read_snapshot(&path).unwrap_err();
    assert!(err.to_string().contains("totalBalance"));
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tallybook::app::App;
use tallybook::currency::RateTable;
use tallybook::error::FxError;
use tallybook::fx::{convert, migrate};
use tallybook::ledger::Ledger;
use tallybook::models::MonthKey;
use tallybook::money::Money;
use tallybook::rates::{FallbackRateSource, FileRateSource, RateSource, StaticRateSource};
use tempfile::tempdir;

struct Unreachable;

impl RateSource for Unreachable {
    fn fetch_rates(&self) -> Result<RateTable, FxError> {
        Err(FxError::Fetch("connection refused".into()))
    }
}

fn rates() -> RateTable {
    RateTable::from_f64_map(
        "USD",
        [("USD", 1.0), ("EUR", 0.9), ("RSD", 117.3), ("JPY", 147.25)],
    )
}

fn populated() -> Ledger {
    let mut ledger = Ledger::new();
    ledger.add_income(Money::new(250_000, 2), 0, 2025).unwrap();
    ledger.add_income(Money::new(1_999, 2), 1, 2025).unwrap();
    ledger
        .add_expense(Money::new(4_550, 2), "categoryFood", 0, 2025)
        .unwrap();
    ledger
        .add_expense(Money::new(12_000, 2), "categoryTransport", 1, 2025)
        .unwrap();
    ledger
}

#[test]
fn same_currency_is_identity() {
    let data = populated().financial_data();
    let m = migrate(&data, "USD", "usd", &rates()).unwrap();
    assert_eq!(m.data, data);
    assert!(!m.fallback_used);
}

#[test]
fn every_value_is_converted_with_the_same_rate() {
    let ledger = populated();
    let data = ledger.financial_data();
    let rates = rates();
    let m = migrate(&data, "USD", "EUR", &rates).unwrap();

    let one = |v: &Money| convert(v, "USD", "EUR", &rates).unwrap().amount;
    assert_eq!(m.data.total_balance, one(&data.total_balance));
    assert_eq!(m.data.total_balance, Money::new(2_119_041, 3)); // 2354.49 * 0.9
    for (key, month) in &data.monthly_data {
        let converted = &m.data.monthly_data[key];
        assert_eq!(converted.income, one(&month.income));
        for (cat, amount) in &month.expenses {
            assert_eq!(converted.expenses[cat], one(amount));
        }
    }
    for (before, after) in data.transactions.iter().zip(&m.data.transactions) {
        assert_eq!(after.id, before.id);
        assert_eq!(after.date, before.date);
        assert_eq!(after.amount, one(&before.amount));
    }
}

#[test]
fn missing_rate_fails_closed() {
    let mut app = App::new(populated(), "USD");
    let before = app.clone();
    let partial = RateTable::from_f64_map("USD", [("EUR", 0.9)]);

    let err = app.change_currency_with("GBP", &partial).unwrap_err();
    assert_eq!(err, FxError::rate_unavailable("GBP"));
    assert_eq!(app, before);
    assert_eq!(app.currency(), "USD");
}

#[test]
fn failed_fetch_leaves_app_untouched() {
    let mut app = App::new(populated(), "USD");
    let before = app.clone();
    assert!(matches!(
        app.change_currency("EUR", &Unreachable),
        Err(FxError::Fetch(_))
    ));
    assert_eq!(app, before);
}

#[test]
fn change_currency_migrates_and_switches() {
    let mut app = App::new(populated(), "USD");
    let change = app.change_currency("rsd", &StaticRateSource).unwrap();
    assert_eq!(change.from, "USD");
    assert_eq!(change.to, "RSD");
    assert_eq!(change.transactions, 4);
    assert!(!change.fallback_used);
    assert_eq!(app.currency(), "RSD");
    assert!(app.ledger().audit().unwrap().is_empty());
    // 2354.49 USD at 103 RSD
    assert_eq!(app.ledger().total_balance(), Money::new(24_251_247, 2));

    // switching to the current currency is a no-op
    let again = app.change_currency("RSD", &Unreachable).unwrap();
    assert_eq!(again.from, again.to);
}

#[test]
fn file_rates_feed_a_currency_change() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.json");
    std::fs::write(&plain, r#"{"USD": 1, "EUR": 0.5, "BAD": -2}"#).unwrap();
    let table = FileRateSource::new(&plain).fetch_rates().unwrap();
    assert_eq!(table.base(), "USD");
    assert_eq!(table.rejected(), ["BAD"]);

    let wrapped = dir.path().join("wrapped.json");
    std::fs::write(
        &wrapped,
        r#"{"base_code": "EUR", "conversion_rates": {"EUR": 1, "USD": 2}}"#,
    )
    .unwrap();
    let table = FileRateSource::new(&wrapped).fetch_rates().unwrap();
    assert_eq!(table.base(), "EUR");

    let mut app = App::new(populated(), "USD");
    app.change_currency("EUR", &FileRateSource::new(&plain)).unwrap();
    assert_eq!(app.ledger().total_balance(), Money::new(1_177_245, 3));

    let missing = FileRateSource::new(dir.path().join("nope.json"));
    assert!(matches!(missing.fetch_rates(), Err(FxError::Fetch(_))));
}

#[test]
fn fallback_source_is_used_when_primary_fails() {
    let source = FallbackRateSource::new(Unreachable, StaticRateSource);
    let table = source.fetch_rates().unwrap();
    assert!(table.rate("EUR").is_ok());
    assert!(table.len() > 30);

    let source = FallbackRateSource::new(Unreachable, Unreachable);
    assert!(source.fetch_rates().is_err());
}

fn busy_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    for i in 0..39i128 {
        let month = (i % 4) as u32;
        ledger
            .add_income(Money::new(i * 12_377 % 50_000 + 101, 2), month, 2025)
            .unwrap();
        let category = if i % 2 == 0 { "categoryFood" } else { "categoryEssentials" };
        ledger
            .add_expense(Money::new(i * 7_919 % 20_000 + 37, 2), category, month, 2025)
            .unwrap();
    }
    ledger
}

#[test]
fn chained_cross_rate_migration_stays_consistent() {
    let rates = RateTable::from_f64_map("USD", [("USD", 1.0), ("EUR", 0.9), ("RSD", 117.3)]);
    let mut app = App::new(busy_ledger(), "USD");
    app.change_currency_with("EUR", &rates).unwrap();
    app.change_currency_with("RSD", &rates).unwrap();
    assert_eq!(app.ledger().migrations(), 2);
    assert!(app.ledger().audit().unwrap().is_empty());

    let dir = tempdir().unwrap();
    let out = dir.path().join("snapshot.json");
    let out_str = out.to_string_lossy().to_string();
    let matches = tallybook::cli::build_cli().get_matches_from([
        "tallybook", "export", "snapshot", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        tallybook::commands::exporter::handle(&app, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }
    let imported = tallybook::commands::importer::read_snapshot(&out).unwrap();
    assert_eq!(&imported, app.ledger());
    assert_eq!(imported.migrations(), 2);
}

#[test]
fn real_drift_is_still_reported_after_migration() {
    let rates = RateTable::from_f64_map("USD", [("USD", 1.0), ("EUR", 0.9), ("RSD", 117.3)]);
    let mut app = App::new(busy_ledger(), "EUR");
    app.change_currency_with("RSD", &rates).unwrap();

    let ledger = app.ledger_mut();
    let mut months = ledger.monthly_data().clone();
    let key: MonthKey = "2025-02".parse().unwrap();
    let month = months.get_mut(&key).unwrap();
    month.income = Money::add(&month.income, &Money::new(100, 2), 18).unwrap();
    let balance = ledger.total_balance();
    ledger.update_financial_data(balance, months, None);

    let drift = ledger.audit().unwrap();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].scope, "2025-02/income");
}

#[test]
fn rates_file_without_usable_rates_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("zero.json");
    std::fs::write(&path, r#"{"USD": 0, "EUR": -1}"#).unwrap();
    let source = FileRateSource::new(&path);
    assert!(matches!(source.fetch_rates(), Err(FxError::Fetch(_))));
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tallybook::app::App;
use tallybook::config::{api_base_url, DEFAULT_API_URL};
use tallybook::currency::RateTable;
use tallybook::db;
use tallybook::ledger::Ledger;
use tallybook::money::Money;
use tallybook::utils::{get_currency, set_setting};

fn conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn fresh_database_loads_defaults() {
    let conn = conn();
    let app = db::load_app(&conn).unwrap();
    assert_eq!(app, App::default());
    assert_eq!(app.currency(), "USD");
    assert_eq!(app.ledger().categories().len(), 5);
}

#[test]
fn ledger_round_trips_through_sqlite() {
    let mut conn = conn();
    let mut ledger = Ledger::new();
    let pets = ledger.add_category("Pets", "paw", "#10b981");
    ledger.add_income("1234.5678".parse().unwrap(), 4, 2024).unwrap();
    ledger.add_expense(Money::new(999, 2), &pets.id, 4, 2024).unwrap();
    let gone = ledger.add_expense(Money::new(1, 2), "categoryFood", 5, 2024).unwrap();
    ledger.revert_transaction(&gone.id).unwrap();
    ledger.delete_category(&pets.id);

    let app = App::new(ledger, "EUR");
    db::save_app(&mut conn, &app).unwrap();
    let loaded = db::load_app(&conn).unwrap();

    assert_eq!(loaded, app);
    assert_eq!(get_currency(&conn).unwrap(), "EUR");
    // amounts keep their stored precision
    assert_eq!(loaded.ledger().transactions()[1].amount.to_string(), "1234.5678");
    assert!(loaded.ledger().audit().unwrap().is_empty());
}

#[test]
fn saving_twice_replaces_previous_state() {
    let mut conn = conn();
    let mut app = App::default();
    app.ledger_mut().add_income(Money::new(100, 0), 0, 2025).unwrap();
    db::save_app(&mut conn, &app).unwrap();

    app.reset_all();
    db::save_app(&mut conn, &app).unwrap();
    let loaded = db::load_app(&conn).unwrap();
    assert!(loaded.ledger().transactions().is_empty());
    assert!(loaded.ledger().monthly_data().is_empty());
    assert!(loaded.ledger().total_balance().is_zero());
}

#[test]
fn snapshot_serializes_camel_case() {
    let mut ledger = Ledger::new();
    ledger
        .add_expense(Money::new(3000, 2), "categoryFood", 5, 2024)
        .unwrap();
    let v = serde_json::to_value(ledger.snapshot()).unwrap();
    assert_eq!(v["totalBalance"], "-30.00");
    assert_eq!(v["monthlyData"]["2024-06"]["expenses"]["categoryFood"], "30.00");
    assert_eq!(v["customCategories"][0]["isBuiltin"], true);
    let tx = &v["transactions"][0];
    assert_eq!(tx["type"], "expense");
    assert_eq!(tx["monthKey"], "2024-06");
    assert_eq!(tx["month"], 5);
    assert_eq!(tx["category"], "categoryFood");
}

#[test]
fn api_url_falls_back_to_setting_then_default() {
    let conn = conn();
    if std::env::var(tallybook::config::API_URL_ENV).is_ok() {
        return;
    }
    assert_eq!(api_base_url(&conn).unwrap(), DEFAULT_API_URL);
    set_setting(&conn, "api_base_url", "https://rates.example").unwrap();
    assert_eq!(api_base_url(&conn).unwrap(), "https://rates.example");
}

#[test]
fn ledger_and_currency_are_saved_together_or_not_at_all() {
    let mut conn = conn();
    let mut app = App::default();
    app.ledger_mut().add_income(Money::new(10_000, 2), 0, 2025).unwrap();
    db::save_app(&mut conn, &app).unwrap();
    let saved = app.clone();

    // refuse any write of the currency setting
    conn.execute_batch(
        "CREATE TRIGGER lock_currency_insert BEFORE INSERT ON settings WHEN NEW.key = 'currency'
         BEGIN SELECT RAISE(ABORT, 'currency locked'); END;
         CREATE TRIGGER lock_currency_update BEFORE UPDATE ON settings WHEN NEW.key = 'currency'
         BEGIN SELECT RAISE(ABORT, 'currency locked'); END;",
    )
    .unwrap();

    let rates = RateTable::from_f64_map("USD", [("EUR", 0.5)]);
    app.change_currency_with("EUR", &rates).unwrap();
    assert!(db::save_app(&mut conn, &app).is_err());

    let loaded = db::load_app(&conn).unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.ledger().total_balance(), Money::new(10_000, 2));
}

#[test]
fn migration_count_survives_reload() {
    let mut conn = conn();
    let mut app = App::default();
    app.ledger_mut().add_income(Money::new(300, 2), 0, 2025).unwrap();
    let rates = RateTable::from_f64_map("USD", [("EUR", 0.9), ("RSD", 117.3)]);
    app.change_currency_with("EUR", &rates).unwrap();
    app.change_currency_with("RSD", &rates).unwrap();
    db::save_app(&mut conn, &app).unwrap();

    let loaded = db::load_app(&conn).unwrap();
    assert_eq!(loaded.ledger().migrations(), 2);
    assert_eq!(loaded.currency(), "RSD");
    assert!(loaded.ledger().audit().unwrap().is_empty());

    let mut reset = loaded.clone();
    reset.reset_all();
    assert_eq!(reset.ledger().migrations(), 0);
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tallybook::app::App;
use tallybook::currency::RateTable;
use tallybook::error::{FxError, ReceiptError, RecordError, Rejected};
use tallybook::ledger::Ledger;
use tallybook::money::Money;
use tallybook::receipt::{decode_response, ParsedReceipt, RAW_DATA_REQUIRED, SCAN_FAILED};

fn receipt(total: f64, currency: &str) -> ParsedReceipt {
    ParsedReceipt {
        total,
        currency: currency.to_string(),
        date: "2025-03-14".to_string(),
        vendor: "Maxi".to_string(),
    }
}

#[test]
fn decodes_parsed_receipt() {
    let r = decode_response(
        r#"{"total": 1549.99, "currency": "RSD", "date": "2025-03-14", "vendor": "Maxi"}"#,
    )
    .unwrap();
    assert_eq!(r, receipt(1549.99, "RSD"));
}

#[test]
fn service_errors_keep_their_tag() {
    let err = decode_response(r#"{"error": "raw_data_required"}"#).unwrap_err();
    assert_eq!(err, ReceiptError::Service(RAW_DATA_REQUIRED.to_string()));
    assert_eq!(err.tag(), RAW_DATA_REQUIRED);

    let err = decode_response("<html>bad gateway</html>").unwrap_err();
    assert!(matches!(err, ReceiptError::Transport(_)));
    assert_eq!(err.tag(), SCAN_FAILED);
}

#[test]
fn receipt_in_display_currency_is_recorded_directly() {
    let mut app = App::new(Ledger::new(), "RSD");
    let tx = app
        .record_receipt(&receipt(1549.99, "rsd"), "categoryFood", 2, 2025, None)
        .unwrap();
    assert_eq!(tx.amount, "1549.99".parse::<Money>().unwrap());
    assert_eq!(app.ledger().total_balance(), "-1549.99".parse::<Money>().unwrap());
}

#[test]
fn foreign_receipt_is_converted() {
    let mut app = App::new(Ledger::new(), "USD");
    let rates = RateTable::from_f64_map("USD", [("RSD", 100.0)]);
    let tx = app
        .record_receipt(&receipt(1550.0, "RSD"), "categoryFood", 2, 2025, Some(&rates))
        .unwrap();
    assert_eq!(tx.amount, Money::new(1550, 2));
}

#[test]
fn foreign_receipt_without_rates_is_refused() {
    let mut app = App::new(Ledger::new(), "USD");
    let before = app.clone();
    let err = app
        .record_receipt(&receipt(10.0, "EUR"), "categoryFood", 2, 2025, None)
        .unwrap_err();
    assert_eq!(err, RecordError::Fx(FxError::rate_unavailable("EUR")));

    let err = app
        .record_receipt(&receipt(0.0, "USD"), "categoryFood", 2, 2025, None)
        .unwrap_err();
    assert_eq!(err, RecordError::Rejected(Rejected::InvalidAmount));
    assert_eq!(app, before);
}

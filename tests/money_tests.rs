// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal_macros::dec;
use std::cmp::Ordering;
use tallybook::error::MoneyError;
use tallybook::money::{Money, MAX_SCALE};

fn m(s: &str) -> Money {
    s.parse().unwrap()
}

#[test]
fn tenths_add_without_float_drift() {
    // 0.1 + 0.2 in binary floats is 0.30000000000000004
    let a = Money::from_f64(0.1);
    let b = Money::from_f64(0.2);
    let sum = Money::add(&a, &b, 2).unwrap();
    assert_eq!(sum, m("0.30"));
    assert_eq!(sum.to_string(), "0.30");

    let mut acc = Money::new(0, 2);
    for _ in 0..1000 {
        acc = Money::add(&acc, &a, 2).unwrap();
    }
    assert_eq!(acc.to_string(), "100.00");
}

#[test]
fn subtract_and_sum_at_fixed_scale() {
    let diff = Money::subtract(&m("100.00"), &m("30.25"), 2).unwrap();
    assert_eq!(diff.to_string(), "69.75");

    let items = [m("1.10"), m("2.20"), m("3.30"), m("-0.60")];
    let forward = Money::sum(items.iter(), 2).unwrap();
    let backward = Money::sum(items.iter().rev(), 2).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(forward.to_string(), "6.00");
    assert_eq!(Money::sum(std::iter::empty::<&Money>(), 2).unwrap(), Money::ZERO);
}

#[test]
fn rescale_rounds_half_away_from_zero() {
    assert_eq!(m("1.005").rescale(2).unwrap().to_string(), "1.01");
    assert_eq!(m("-1.005").rescale(2).unwrap().to_string(), "-1.01");
    assert_eq!(m("1.004").rescale(2).unwrap().to_string(), "1.00");
    assert_eq!(m("2.5").rescale(4).unwrap().to_string(), "2.5000");
}

#[test]
fn non_finite_inputs_become_zero() {
    assert!(Money::from_f64(f64::NAN).is_zero());
    assert!(Money::from_f64(f64::INFINITY).is_zero());
    assert!(Money::from_f64(f64::NEG_INFINITY).is_zero());
    assert_eq!(Money::from_f64(12.5), m("12.5"));
}

#[test]
fn compare_across_scales() {
    assert_eq!(Money::compare(&m("1.50"), &m("1.5")), Ordering::Equal);
    assert!(Money::equal(&m("10"), &m("10.000")));
    assert_eq!(Money::compare(&m("1.49"), &m("1.5")), Ordering::Less);
    assert_eq!(Money::compare(&m("-2"), &m("-3.0")), Ordering::Greater);
    // lower-scale side overflows when lifted to scale 18
    let huge = Money::new(i128::MAX / 10, 0);
    let tiny = Money::new(1, MAX_SCALE);
    assert_eq!(Money::compare(&huge, &tiny), Ordering::Greater);
    assert_eq!(Money::compare(&tiny, &huge), Ordering::Less);
}

#[test]
fn multiply_keeps_precise_multiplier() {
    let r = Money::multiply(&m("100.00"), dec!(0.123456), 2).unwrap();
    assert_eq!(r, m("12.3456"));
    // integer multiplier still scaled to two digits
    let r = Money::multiply(&m("19.99"), dec!(3), 2).unwrap();
    assert_eq!(r, m("59.97"));
}

#[test]
fn overflow_is_reported() {
    let big = Money::new(i128::MAX, 0);
    assert_eq!(Money::add(&big, &m("1"), 0), Err(MoneyError::Overflow));
    assert_eq!(big.rescale(2), Err(MoneyError::Overflow));
}

#[test]
fn parse_and_display() {
    assert_eq!(m("-0.05").to_string(), "-0.05");
    assert_eq!(m(".5").to_string(), "0.5");
    assert_eq!(m("+42").to_string(), "42");
    assert!("".parse::<Money>().is_err());
    assert!("1.2.3".parse::<Money>().is_err());
    assert!("12a".parse::<Money>().is_err());
    assert!("0.1234567890123456789".parse::<Money>().is_err());
}

#[test]
fn serde_accepts_strings_and_numbers() {
    let v: Money = serde_json::from_str("\"70.00\"").unwrap();
    assert_eq!(v.to_string(), "70.00");
    let v: Money = serde_json::from_str("70.5").unwrap();
    assert_eq!(v, m("70.5"));
    let v: Money = serde_json::from_str("3").unwrap();
    assert_eq!(v, m("3"));
    assert_eq!(serde_json::to_string(&m("9.999999999")).unwrap(), "\"9.999999999\"");
}

#[test]
fn negate_and_abs() {
    assert_eq!(m("-2.50").abs().unwrap(), m("2.5"));
    assert_eq!(m("2.50").abs().unwrap().to_string(), "2.50");
    assert_eq!(m("0.01").negate().unwrap(), m("-0.01"));
    let min = Money::new(i128::MIN, 0);
    assert_eq!(min.negate(), Err(MoneyError::Overflow));
    assert_eq!(min.abs(), Err(MoneyError::Overflow));
}

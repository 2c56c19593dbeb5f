// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed-point money: an integer count of minor units plus an implied number
//! of decimal digits. Every stored amount goes through this type; binary
//! floats only appear at the input boundary (`from_f64`) and in the
//! converter's degraded fallback path.

use crate::error::MoneyError;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Largest scale a stored amount may carry. Conversion results are capped here.
pub const MAX_SCALE: u32 = 18;

#[derive(Debug, Clone, Copy, Default)]
pub struct Money {
    minor_units: i128,
    scale: u32,
}

fn pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}

/// Integer division rounding half away from zero.
fn div_round(value: i128, divisor: i128) -> i128 {
    let q = value / divisor;
    let r = (value % divisor).abs();
    if divisor - r <= r {
        q + value.signum()
    } else {
        q
    }
}

impl Money {
    pub const ZERO: Money = Money {
        minor_units: 0,
        scale: 0,
    };

    pub const fn new(minor_units: i128, scale: u32) -> Self {
        Self { minor_units, scale }
    }

    pub fn minor_units(&self) -> i128 {
        self.minor_units
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn from_decimal(d: Decimal) -> Self {
        Self::new(d.mantissa(), d.scale())
    }

    /// `None` when the value does not fit rust_decimal's 96-bit mantissa.
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::try_from_i128_with_scale(self.minor_units, self.scale).ok()
    }

    /// Boundary conversion for amounts typed or received as floats.
    /// NaN, infinities and out-of-range values become zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Decimal::try_from(value)
            .map(|d| Self::from_decimal(d).normalized())
            .unwrap_or(Self::ZERO)
    }

    pub fn to_f64(&self) -> f64 {
        self.minor_units as f64 / 10f64.powi(self.scale as i32)
    }

    pub fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    pub fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    pub fn is_negative(&self) -> bool {
        self.minor_units < 0
    }

    /// Re-express at `scale`. Raising the scale is exact and may overflow;
    /// lowering it rounds half away from zero.
    pub fn rescale(&self, scale: u32) -> Result<Money, MoneyError> {
        match scale.cmp(&self.scale) {
            Ordering::Equal => Ok(*self),
            Ordering::Greater => {
                let factor = pow10(scale - self.scale).ok_or(MoneyError::Overflow)?;
                let units = self
                    .minor_units
                    .checked_mul(factor)
                    .ok_or(MoneyError::Overflow)?;
                Ok(Money::new(units, scale))
            }
            Ordering::Less => Ok(self.round_dp(scale)),
        }
    }

    /// Round to at most `dp` decimal digits. Never raises the scale.
    pub fn round_dp(&self, dp: u32) -> Money {
        if dp >= self.scale {
            return *self;
        }
        match pow10(self.scale - dp) {
            Some(divisor) => Money::new(div_round(self.minor_units, divisor), dp),
            // |i128| < 10^39, so anything past 38 digits rounds to zero
            None => Money::new(0, dp),
        }
    }

    /// Strip trailing fractional zeros.
    pub fn normalized(&self) -> Money {
        let mut units = self.minor_units;
        let mut scale = self.scale;
        while scale > 0 && units % 10 == 0 {
            units /= 10;
            scale -= 1;
        }
        Money::new(units, scale)
    }

    pub fn negate(&self) -> Result<Money, MoneyError> {
        let units = self.minor_units.checked_neg().ok_or(MoneyError::Overflow)?;
        Ok(Money::new(units, self.scale))
    }

    pub fn abs(&self) -> Result<Money, MoneyError> {
        if self.is_negative() {
            self.negate()
        } else {
            Ok(*self)
        }
    }

    pub fn common_scale(a: &Money, b: &Money) -> u32 {
        a.scale.max(b.scale)
    }

    pub fn add(a: &Money, b: &Money, scale: u32) -> Result<Money, MoneyError> {
        let a = a.rescale(scale)?;
        let b = b.rescale(scale)?;
        let units = a
            .minor_units
            .checked_add(b.minor_units)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(units, scale))
    }

    pub fn subtract(a: &Money, b: &Money, scale: u32) -> Result<Money, MoneyError> {
        let a = a.rescale(scale)?;
        let b = b.rescale(scale)?;
        let units = a
            .minor_units
            .checked_sub(b.minor_units)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(units, scale))
    }

    pub fn sum<'a, I>(items: I, scale: u32) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        items
            .into_iter()
            .try_fold(Money::new(0, scale), |acc, m| Money::add(&acc, m, scale))
    }

    pub fn compare(a: &Money, b: &Money) -> Ordering {
        let scale = Money::common_scale(a, b);
        match (a.rescale(scale), b.rescale(scale)) {
            (Ok(x), Ok(y)) => x.minor_units.cmp(&y.minor_units),
            // only the lower-scale side can overflow, and then it is the larger magnitude
            (Err(_), _) => a.minor_units.signum().cmp(&0),
            (_, Err(_)) => 0.cmp(&b.minor_units.signum()),
        }
    }

    pub fn equal(a: &Money, b: &Money) -> bool {
        Money::compare(a, b) == Ordering::Equal
    }

    /// Multiply by a decimal factor. The factor is held as an integer at its
    /// own precision (never fewer than 2 digits), so a precise rate is not
    /// truncated; the product carries `scale + factor digits`, capped at
    /// [`MAX_SCALE`].
    pub fn multiply(amount: &Money, multiplier: Decimal, scale: u32) -> Result<Money, MoneyError> {
        let factor_scale = multiplier.scale().max(2);
        let factor = Money::from_decimal(multiplier).rescale(factor_scale)?;
        let base = amount.rescale(scale)?;
        let units = base
            .minor_units
            .checked_mul(factor.minor_units)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(units, scale + factor_scale)
            .round_dp(MAX_SCALE)
            .normalized())
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        Money::equal(self, other)
    }
}

impl Eq for Money {}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        Money::compare(self, other)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let digits = self.minor_units.unsigned_abs().to_string();
        if self.scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let width = self.scale as usize + 1;
        let padded = format!("{digits:0>width$}");
        let (int_part, frac_part) = padded.split_at(padded.len() - self.scale as usize);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || MoneyError::Parse(s.to_string());
        let (negative, body) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac_part.len() > MAX_SCALE as usize {
            return Err(invalid());
        }
        let digits = format!("{int_part}{frac_part}");
        let units: i128 = digits.parse().map_err(|_| MoneyError::Overflow)?;
        let units = if negative { -units } else { units };
        Ok(Money::new(units, frac_part.len() as u32))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money::new(v as i128, 0))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        Ok(Money::new(v as i128, 0))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Ok(Money::from_f64(v))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

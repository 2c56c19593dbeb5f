// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::api_base_url;
use crate::currency::normalize_code;
use crate::fx::convert;
use crate::rates::{FallbackRateSource, FileRateSource, HttpRateSource, RateSource, StaticRateSource};
use crate::utils::{maybe_print_json, parse_amount, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("convert", sub)) => convert_amount(conn, sub)?,
        Some(("rates", sub)) => list_rates(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// `--rates-file` when given, otherwise the rate service with the built-in
/// table behind it.
pub fn rate_source(conn: &Connection, sub: &clap::ArgMatches) -> Result<Box<dyn RateSource>> {
    if let Some(path) = sub.get_one::<String>("rates-file") {
        return Ok(Box::new(FileRateSource::new(path)));
    }
    let http = HttpRateSource::new(&api_base_url(conn)?)?;
    Ok(Box::new(FallbackRateSource::new(http, StaticRateSource)))
}

fn convert_amount(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_amount(required(sub, "amount")?)?;
    let from = normalize_code(required(sub, "from")?);
    let to = normalize_code(required(sub, "to")?);
    let rates = rate_source(conn, sub)?.fetch_rates()?;
    let res = convert(&amount, &from, &to, &rates)?;
    let note = if res.fallback_used { " (approximate)" } else { "" };
    println!("{} {} -> {} {}{}", amount, from, res.amount.round_dp(4), to, note);
    Ok(())
}

fn list_rates(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rates = rate_source(conn, sub)?.fetch_rates()?;
    let mut data = Vec::new();
    for code in rates.codes() {
        data.push(vec![
            rates.base().to_string(),
            code.to_string(),
            rates.rate(code)?.to_string(),
        ]);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Base", "Quote", "Rate"], data));
    }
    if !rates.rejected().is_empty() {
        println!("Ignored invalid rates for: {}", rates.rejected().join(", "));
    }
    Ok(())
}

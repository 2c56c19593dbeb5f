// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::get_setting;
use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const API_URL_ENV: &str = "TALLYBOOK_API_URL";
pub const DB_PATH_ENV: &str = "TALLYBOOK_DB";
pub const DEFAULT_LOG_FILTER: &str = "tallybook=info";

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Base URL of the rate and receipt services: environment, then the
/// `api_base_url` setting, then the local default.
pub fn api_base_url(conn: &Connection) -> Result<String> {
    if let Some(url) = non_empty_env(API_URL_ENV) {
        return Ok(url);
    }
    Ok(get_setting(conn, "api_base_url")?.unwrap_or_else(|| DEFAULT_API_URL.to_string()))
}

pub fn db_path_override() -> Option<PathBuf> {
    non_empty_env(DB_PATH_ENV).map(PathBuf::from)
}

pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

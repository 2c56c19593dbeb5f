// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analytics;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod currency;
pub mod db;
pub mod error;
pub mod fx;
pub mod ledger;
pub mod models;
pub mod money;
pub mod rates;
pub mod receipt;
pub mod utils;

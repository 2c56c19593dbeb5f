// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ReceiptError;
use crate::utils::http_client;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const RAW_DATA_REQUIRED: &str = "raw_data_required";
pub const RAW_DATA_EMPTY: &str = "raw_data_empty";
pub const SCAN_FAILED: &str = "scan_failed";

/// Structured data read from a fiscal receipt QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    pub total: f64,
    pub currency: String,
    pub date: String,
    pub vendor: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParseReceiptResponse {
    Parsed(ParsedReceipt),
    Failed { error: String },
}

impl ReceiptError {
    /// Tag shown to the user; transport failures read as a failed scan.
    pub fn tag(&self) -> &str {
        match self {
            ReceiptError::Service(tag) => tag,
            ReceiptError::Transport(_) => SCAN_FAILED,
        }
    }
}

pub trait ReceiptParser {
    fn parse_receipt(&self, raw_data: &str) -> Result<ParsedReceipt, ReceiptError>;
}

pub struct HttpReceiptParser {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpReceiptParser {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }
}

impl ReceiptParser for HttpReceiptParser {
    fn parse_receipt(&self, raw_data: &str) -> Result<ParsedReceipt, ReceiptError> {
        if raw_data.trim().is_empty() {
            return Err(ReceiptError::Service(RAW_DATA_EMPTY.to_string()));
        }
        let url = format!("{}/parse-receipt", self.base_url);
        let transport = |e: reqwest::Error| ReceiptError::Transport(e.to_string());
        let resp = self
            .client
            .post(url)
            .json(&json!({ "rawData": raw_data }))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(transport)?;
        decode_response(&resp.text().map_err(transport)?)
    }
}

/// Decode the parse-receipt response body.
pub fn decode_response(body: &str) -> Result<ParsedReceipt, ReceiptError> {
    match serde_json::from_str::<ParseReceiptResponse>(body) {
        Ok(ParseReceiptResponse::Parsed(receipt)) => Ok(receipt),
        Ok(ParseReceiptResponse::Failed { error }) => Err(ReceiptError::Service(error)),
        Err(e) => Err(ReceiptError::Transport(e.to_string())),
    }
}

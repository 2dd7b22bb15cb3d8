// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Catalog product records.
//!
//! Products live in the [`PRODUCTS_COLLECTION`] collection. The schema check
//! here is what the remote store applies before accepting a product write.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::op::Payload;

/// Collection holding scanned products.
pub const PRODUCTS_COLLECTION: &str = "products";

const REQUIRED_STRINGS: &[&str] = &["barcode", "name", "scannedAt"];
const OPTIONAL_STRINGS: &[&str] = &["id", "brand", "image", "category", "notes"];
const OPTIONAL_NUMBERS: &[&str] = &["scannedCount", "price", "quantity"];

/// A scanned catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub barcode: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub scanned_at: String,
    #[serde(default = "default_scanned_count")]
    pub scanned_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_scanned_count() -> u32 {
    1
}

impl Product {
    /// Builds the record for a first scan of a barcode.
    pub fn scanned(barcode: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Product {
            id: None,
            barcode: barcode.into(),
            name: name.into(),
            brand: None,
            image: None,
            category: None,
            scanned_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            scanned_count: 1,
            price: None,
            quantity: None,
            notes: None,
        }
    }

    /// Converts the product into a queue payload.
    pub fn into_payload(self) -> Result<Payload> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::Validation(format!("product serialized to non-object: {other}"))),
        }
    }
}

/// Validates a product payload.
///
/// With `partial`, required fields may be absent (field-level updates), but
/// any field present must still have the right type. Unknown fields are
/// allowed.
pub fn validate(payload: &Payload, partial: bool) -> Result<()> {
    let mut problems = Vec::new();

    for field in REQUIRED_STRINGS {
        match payload.get(*field) {
            Some(Value::String(_)) => {}
            None if partial => {}
            None => problems.push(format!("'{field}' is required")),
            Some(_) => problems.push(format!("'{field}' must be a string")),
        }
    }

    for field in OPTIONAL_STRINGS {
        match payload.get(*field) {
            None | Some(Value::String(_)) => {}
            Some(_) => problems.push(format!("'{field}' must be a string")),
        }
    }

    for field in OPTIONAL_NUMBERS {
        match payload.get(*field) {
            None | Some(Value::Number(_)) => {}
            Some(_) => problems.push(format!("'{field}' must be a number")),
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid product: {}", problems.join(", "))))
    }
}

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;

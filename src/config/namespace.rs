// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{OperatorError, Result};

/// Maximum length of an RFC 1123 label
const MAX_LABEL_LEN: usize = 63;

/// Check that `namespace` is empty (no override) or a valid RFC 1123 label.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() || is_dns_label(namespace) {
        Ok(())
    } else {
        Err(OperatorError::InvalidNamespace(namespace.to_string()))
    }
}

fn is_dns_label(value: &str) -> bool {
    let bytes = value.as_bytes();
    let edge_ok = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();

    bytes.len() <= MAX_LABEL_LEN
        && bytes.first().is_some_and(edge_ok)
        && bytes.last().is_some_and(edge_ok)
        && bytes.iter().all(|b| edge_ok(b) || *b == b'-')
}

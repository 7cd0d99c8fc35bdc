//! Table name derivation and validation

use crate::{Error, Result};

/// Longest table name accepted; matches common SQL identifier limits.
pub const MAX_TABLE_NAME_LEN: usize = 63;

const FALLBACK_TABLE_NAME: &str = "dataset";

/// Derive a storage table name from a human dataset name.
///
/// `"Q1 Sales-2024.final"` becomes `"q1_sales_2024_final"`. The result
/// always passes [`validate_table_name`].
pub fn to_table_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        let c = match c {
            ' ' | '-' | '.' => '_',
            c if c.is_ascii_alphanumeric() || c == '_' => c,
            _ => continue,
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let mut name = out.trim_matches('_').to_string();
    if name.is_empty() {
        return FALLBACK_TABLE_NAME.to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "ds_");
    }
    if name.len() > MAX_TABLE_NAME_LEN {
        name.truncate(MAX_TABLE_NAME_LEN);
        name.truncate(name.trim_end_matches('_').len());
    }
    name
}

/// Check that a table name is safe for every storage backend.
pub fn validate_table_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidTableName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name is empty");
    }
    if name.len() > MAX_TABLE_NAME_LEN {
        return invalid("name is too long");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return invalid("only lowercase letters, digits and '_' are allowed");
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return invalid("name must not start with a digit");
    }
    Ok(())
}

//! CSV feed parsing
//!
//! The delimiter is sniffed from the header line alone: `;` when the header
//! contains `;` and no `,`, otherwise `,`. Quoted fields, CRLF line endings
//! and a leading UTF-8 byte-order mark are accepted. Quantities are kept as
//! raw strings; numeric coercion belongs to the apply step.

use std::collections::HashMap;
use stock_sync_common::{Result, SyncError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One usable feed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    /// Trimmed
    pub sku: String,
    /// Trimmed, not yet coerced
    pub quantity: String,
}

/// Delimiter for a header line
pub fn sniff_delimiter(header_line: &str) -> u8 {
    if header_line.contains(';') && !header_line.contains(',') {
        b';'
    } else {
        b','
    }
}

/// Extract `(sku, quantity)` rows using the configured column names
pub fn parse(raw: &[u8], sku_column: &str, stock_column: &str) -> Result<Vec<FeedRow>> {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);

    let header_line = raw
        .split(|b| *b == b'\n')
        .map(|line| String::from_utf8_lossy(line))
        .find(|line| !line.trim().is_empty())
        .ok_or(SyncError::EmptyFeed)?;
    let delimiter = sniff_delimiter(&header_line);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(raw);

    let mut records = reader.byte_records().filter(|record| match record {
        Ok(record) => !is_blank(record),
        Err(_) => true,
    });

    let header = match records.next() {
        Some(record) => record.map_err(|e| SyncError::InvalidCsv(e.to_string()))?,
        None => return Err(SyncError::EmptyFeed),
    };
    let headers: Vec<String> = header.iter().map(field_text).collect();

    let mut lookup: HashMap<String, usize> = HashMap::with_capacity(headers.len());
    for (index, name) in headers.iter().enumerate() {
        lookup.entry(name.to_lowercase()).or_insert(index);
    }

    let column = |name: &str| lookup.get(&name.trim().to_lowercase()).copied();
    let (sku_idx, stock_idx) = match (column(sku_column), column(stock_column)) {
        (Some(sku_idx), Some(stock_idx)) => (sku_idx, stock_idx),
        _ => {
            return Err(SyncError::ColumnNotFound {
                sku_column: sku_column.to_string(),
                stock_column: stock_column.to_string(),
                available_headers: headers,
            })
        }
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| SyncError::InvalidCsv(e.to_string()))?;
        if let (Some(sku), Some(quantity)) = (record.get(sku_idx), record.get(stock_idx)) {
            rows.push(FeedRow {
                sku: field_text(sku),
                quantity: field_text(quantity),
            });
        }
    }

    if rows.is_empty() {
        return Err(SyncError::NoData);
    }

    tracing::debug!(
        rows = rows.len(),
        delimiter = %char::from(delimiter),
        "Parsed CSV feed"
    );
    Ok(rows)
}

fn field_text(field: &[u8]) -> String {
    String::from_utf8_lossy(field).trim().to_string()
}

/// A whitespace-only line; delimiter-only lines such as `,` are rows
fn is_blank(record: &csv::ByteRecord) -> bool {
    record.len() == 1 && record.iter().all(|field| field.iter().all(u8::is_ascii_whitespace))
}

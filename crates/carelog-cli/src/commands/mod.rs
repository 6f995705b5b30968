//! Command execution

pub mod context;
pub mod documents;
pub mod records;
pub mod triage;

use serde_json::Value;

/// Parse repeated `KEY=VALUE` arguments into ordered pairs. Values that
/// parse as JSON are kept structured; anything else is a plain string.
pub(crate) fn parse_pairs(pairs: &[String]) -> anyhow::Result<Vec<(String, Value)>> {
    pairs
        .iter()
        .map(|pair| {
            let (key, raw) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Expected KEY=VALUE, got '{}'", pair))?;
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            Ok((key.to_string(), value))
        })
        .collect()
}

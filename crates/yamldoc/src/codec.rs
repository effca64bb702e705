//! YAML encode/decode on top of `serde_yaml`.
//!
//! The dumper uses a fixed two-space indentation and always terminates the
//! last line. `pretty_print` adds one more newline after that.

use serde::Serialize;
use serde_yaml::Value;
use std::path::Path;
use yamldoc_core::{EncodeOptions, Error, Result};

/// Encode any serializable value as YAML text
pub fn encode<T: Serialize + ?Sized>(value: &T, options: EncodeOptions) -> Result<String> {
    let mut text = serde_yaml::to_string(value).map_err(|e| Error::encode_error(e.to_string()))?;

    if options.pretty_print {
        text.push('\n');
    }

    Ok(text)
}

/// Decode YAML text into a document.
///
/// Empty input short-circuits to `None` without touching the parser. A
/// document whose root is null also yields `None`.
pub fn decode(text: &str, origin: Option<&Path>) -> Result<Option<Value>> {
    if text.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_yaml::from_str(text).map_err(|e| {
        let origin = origin
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<string>".to_string());
        Error::parse_error(origin, e.to_string())
    })?;

    match value {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

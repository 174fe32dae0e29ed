use serde_json::Value;

use crate::DecodedValue;

/// Parse `raw` as JSON, falling back to the text itself.
///
/// Never fails. A [`DecodedValue::Raw`] result is the fallback signal; callers
/// decide whether to warn about it. Invalid UTF-8 is replaced lossily.
pub fn decode(raw: &[u8]) -> DecodedValue {
    match serde_json::from_slice::<Value>(raw) {
        Ok(value) => DecodedValue::Structured(value),
        Err(_) => DecodedValue::Raw(String::from_utf8_lossy(raw).into_owned()),
    }
}

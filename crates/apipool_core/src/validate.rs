use serde_json::Value;

/// `false` for an empty payload, otherwise whether it parses as JSON.
pub fn is_valid(raw: &[u8]) -> bool {
    if raw.is_empty() {
        return false;
    }
    serde_json::from_slice::<Value>(raw).is_ok()
}

/// Whether a `Content-Type` header announces a JSON body
/// (`application/json` or any `+json` suffix type).
pub fn declares_structured(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Acceptance rule for a 200 response body.
///
/// Bodies that declare JSON must be well-formed JSON. Anything else only has
/// to be non-empty; the decoder keeps it as raw text.
pub fn is_acceptable(raw: &[u8], content_type: Option<&str>) -> bool {
    if declares_structured(content_type) {
        is_valid(raw)
    } else {
        !raw.is_empty()
    }
}

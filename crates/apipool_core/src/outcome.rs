use std::fmt;

use serde_json::{json, Value};

/// Reason recorded when a 200 response carries an unacceptable payload.
pub const INVALID_RESPONSE: &str = "invalid response";

/// A fetched payload, either parsed or kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Structured(Value),
    /// Text that did not parse; structured fields are not available.
    Raw(String),
}

impl DecodedValue {
    pub fn is_structured(&self) -> bool {
        matches!(self, DecodedValue::Structured(_))
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, DecodedValue::Raw(_))
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            DecodedValue::Structured(value) => Some(value),
            DecodedValue::Raw(_) => None,
        }
    }

    /// Pretty JSON for display. Raw text is wrapped as `{"raw": ...}`.
    pub fn to_pretty(&self) -> String {
        let wrapped;
        let value = match self {
            DecodedValue::Structured(value) => value,
            DecodedValue::Raw(text) => {
                wrapped = json!({ "raw": text });
                &wrapped
            }
        };
        // Serializing a `Value` to a String cannot fail.
        serde_json::to_string_pretty(value).unwrap_or_default()
    }
}

/// Terminal state of one endpoint in one run.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(DecodedValue),
    /// Connection, DNS, timeout or body-read failure.
    TransportError(String),
    /// Any status other than 200.
    HttpError(u16),
    /// Status 200 with an empty or malformed payload.
    ValidationError(String),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// User-facing reason for the error variants, `None` on success.
    pub fn error_reason(&self) -> Option<String> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::TransportError(message) => Some(message.clone()),
            FetchOutcome::HttpError(code) => Some(format!("HTTP status code {code}")),
            FetchOutcome::ValidationError(reason) => Some(reason.clone()),
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_reason() {
            Some(reason) => f.write_str(&reason),
            None => f.write_str("success"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_pretty_print_as_wrapper_object() {
        let raw = DecodedValue::Raw("not json".to_string());
        assert_eq!(raw.to_pretty(), "{\n  \"raw\": \"not json\"\n}");
        assert!(raw.as_structured().is_none());
    }

    #[test]
    fn error_reasons() {
        assert_eq!(
            FetchOutcome::HttpError(404).error_reason().as_deref(),
            Some("HTTP status code 404")
        );
        assert_eq!(
            FetchOutcome::ValidationError(INVALID_RESPONSE.into()).to_string(),
            "invalid response"
        );
        assert_eq!(
            FetchOutcome::TransportError("timeout".into()).to_string(),
            "timeout"
        );
        let ok = FetchOutcome::Success(DecodedValue::Structured(json!(1)));
        assert!(ok.error_reason().is_none());
        assert!(ok.is_success());
    }
}

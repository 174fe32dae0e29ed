use std::borrow::Borrow;
use std::fmt;

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidUrlError {
    #[error("invalid url {url:?}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("invalid url {url:?}: missing host")]
    MissingHost { url: String },
}

/// A registered target URL.
///
/// Equality and hashing use the text as submitted, so two registrations of
/// the same string are the same endpoint. Requests go to [`Endpoint::sanitized`].
#[derive(Debug, Clone)]
pub struct Endpoint {
    raw: String,
    sanitized: Url,
}

impl Endpoint {
    /// Accepts absolute URLs that carry both a scheme and a non-empty host.
    pub fn parse(input: &str) -> Result<Self, InvalidUrlError> {
        let sanitized = Url::parse(input).map_err(|err| InvalidUrlError::Malformed {
            url: input.to_string(),
            reason: err.to_string(),
        })?;
        match sanitized.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => {
                return Err(InvalidUrlError::MissingHost {
                    url: input.to_string(),
                })
            }
        }
        Ok(Self {
            raw: input.to_string(),
            sanitized,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized form with unsafe characters percent-encoded.
    pub fn sanitized(&self) -> &Url {
        &self.sanitized
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Endpoint {}

impl std::hash::Hash for Endpoint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

// Lookups by `&str` must agree with the text-based `Hash`/`Eq` above.
impl Borrow<str> for Endpoint {
    fn borrow(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

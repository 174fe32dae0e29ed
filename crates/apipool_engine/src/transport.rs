use std::fmt;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::{FetchSettings, TransportInitError};

/// Status, declared media type and body of one completed exchange.
///
/// Non-2xx responses are returned here like any other; classifying them is
/// the engine's job. Only a 200 body is read, so the size cap never hides a
/// status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: u64 },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large ({actual} bytes, limit {max_bytes})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// One shared request multiplexer, alive for a single `fetch_all` call.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportFailure>;
}

/// Creates the transport at the start of each batch.
pub trait Connector: Send + Sync {
    fn connect(&self, settings: &FetchSettings) -> Result<Box<dyn Transport>, TransportInitError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestConnector;

impl Connector for ReqwestConnector {
    fn connect(&self, settings: &FetchSettings) -> Result<Box<dyn Transport>, TransportInitError> {
        Ok(Box::new(ReqwestTransport::new(settings)?))
    }
}

/// Transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_bytes: u64,
}

impl ReqwestTransport {
    pub fn new(settings: &FetchSettings) -> Result<Self, TransportInitError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| TransportInitError::Client(err.to_string()))?;
        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
        })
    }

    fn too_large(&self, actual: u64) -> TransportFailure {
        TransportFailure::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual,
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportFailure> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Ok(RawResponse {
                status,
                content_type: None,
                body: Vec::new(),
            });
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(next_len));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        return TransportFailure::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return TransportFailure::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    TransportFailure::new(FailureKind::Network, err.to_string())
}

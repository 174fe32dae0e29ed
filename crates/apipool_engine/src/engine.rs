use std::sync::Arc;

use apipool_core::{decode, is_acceptable, Endpoint, FetchOutcome, RunResult, INVALID_RESPONSE};
use engine_logging::{engine_debug, AuditLog, Level};
use futures_util::future::join_all;
use tokio::sync::Semaphore;

use crate::transport::{Connector, FailureKind, RawResponse, ReqwestConnector, Transport, TransportFailure};
use crate::FetchSettings;

/// Transport detail recorded when a request exceeds its time budget.
pub const TIMEOUT_DETAIL: &str = "timeout";

/// The batch could not start: nothing was dispatched.
#[derive(Debug, thiserror::Error)]
pub enum TransportInitError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("blocking fetch called from inside an async runtime")]
    NestedRuntime,
}

/// Fans one GET out per endpoint and classifies every response.
pub struct FetchEngine {
    settings: FetchSettings,
    connector: Arc<dyn Connector>,
    audit: Arc<dyn AuditLog>,
}

impl FetchEngine {
    pub fn new(settings: FetchSettings, audit: Arc<dyn AuditLog>) -> Self {
        Self::with_connector(settings, Arc::new(ReqwestConnector), audit)
    }

    pub fn with_connector(
        settings: FetchSettings,
        connector: Arc<dyn Connector>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            settings,
            connector,
            audit,
        }
    }

    /// Dispatches every endpoint concurrently and waits for all of them.
    ///
    /// The result holds one entry per distinct endpoint, in registration
    /// order. Per-endpoint failures are outcomes, not errors; only a transport
    /// that cannot be created fails the call.
    pub async fn fetch_all(&self, endpoints: &[Endpoint]) -> Result<RunResult, TransportInitError> {
        let transport = self.connector.connect(&self.settings)?;
        let limiter = self.settings.max_in_flight.map(|cap| Semaphore::new(cap.max(1)));
        engine_debug!(
            "Dispatching {} requests (max in flight: {:?})",
            endpoints.len(),
            self.settings.max_in_flight
        );

        let pending = endpoints
            .iter()
            .map(|endpoint| self.fetch_one(transport.as_ref(), limiter.as_ref(), endpoint));
        let outcomes = join_all(pending).await;

        let mut results = RunResult::new();
        for (endpoint, outcome) in endpoints.iter().zip(outcomes) {
            results.insert(endpoint.clone(), outcome);
        }
        Ok(results)
    }

    /// Runs [`FetchEngine::fetch_all`] on a private runtime, blocking the
    /// calling thread. Called from inside an async context it returns
    /// [`TransportInitError::NestedRuntime`] without dispatching anything.
    pub fn fetch_all_blocking(&self, endpoints: &[Endpoint]) -> Result<RunResult, TransportInitError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(TransportInitError::NestedRuntime);
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.fetch_all(endpoints))
    }

    async fn fetch_one(
        &self,
        transport: &dyn Transport,
        limiter: Option<&Semaphore>,
        endpoint: &Endpoint,
    ) -> FetchOutcome {
        let response = {
            // The semaphore is never closed, so acquisition only fails if it were.
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire().await.ok(),
                None => None,
            };
            let request = transport.get(endpoint.sanitized());
            match tokio::time::timeout(self.settings.request_timeout, request).await {
                Ok(Ok(response)) => Ok(response),
                Ok(Err(failure)) => Err(transport_detail(&failure)),
                Err(_) => Err(TIMEOUT_DETAIL.to_string()),
            }
        };
        self.classify(endpoint, response)
    }

    fn classify(&self, endpoint: &Endpoint, response: Result<RawResponse, String>) -> FetchOutcome {
        let response = match response {
            Ok(response) => response,
            Err(detail) => {
                self.audit.log(
                    &format!("Error fetching data from {endpoint}: {detail}"),
                    Level::Error,
                );
                return FetchOutcome::TransportError(detail);
            }
        };

        if response.status != 200 {
            self.audit.log(
                &format!(
                    "Error fetching data from {endpoint}: HTTP status code {}",
                    response.status
                ),
                Level::Error,
            );
            return FetchOutcome::HttpError(response.status);
        }

        if !is_acceptable(&response.body, response.content_type.as_deref()) {
            self.audit
                .log(&format!("Invalid response from {endpoint}"), Level::Error);
            return FetchOutcome::ValidationError(INVALID_RESPONSE.to_string());
        }

        let decoded = decode(&response.body);
        if decoded.is_raw() {
            self.audit.log(
                "Failed to decode JSON response, returning raw response",
                Level::Warning,
            );
        }
        self.audit.log(
            &format!("Successfully fetched data from {endpoint}"),
            Level::Info,
        );
        FetchOutcome::Success(decoded)
    }
}

fn transport_detail(failure: &TransportFailure) -> String {
    match failure.kind {
        FailureKind::Timeout => TIMEOUT_DETAIL.to_string(),
        FailureKind::TooLarge { .. } => failure.kind.to_string(),
        FailureKind::RedirectLimitExceeded | FailureKind::Network => failure.message.clone(),
    }
}

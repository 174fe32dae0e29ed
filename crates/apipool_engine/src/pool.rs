use std::io::{self, Write};
use std::sync::Arc;

use apipool_core::{Endpoint, EndpointRegistry, InvalidUrlError, RunResult};
use engine_logging::{engine_info, AuditLog, Level};

use crate::{Connector, FetchEngine, FetchSettings, ResultReporter, TransportInitError};

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error(transparent)]
    Transport(#[from] TransportInitError),
    #[error("failed to write report: {0}")]
    Report(#[from] io::Error),
}

/// Owns the endpoint list and the outcome of the latest run.
///
/// `run` takes `&mut self`, so the registry cannot change while a batch is in
/// flight.
pub struct Pool {
    registry: EndpointRegistry,
    engine: FetchEngine,
    reporter: ResultReporter,
    last_run: Option<RunResult>,
}

impl Pool {
    pub fn new(audit: Arc<dyn AuditLog>) -> Self {
        Self::with_settings(audit, FetchSettings::default())
    }

    pub fn with_settings(audit: Arc<dyn AuditLog>, settings: FetchSettings) -> Self {
        let engine = FetchEngine::new(settings, audit.clone());
        Self::with_engine(audit, engine)
    }

    pub fn with_connector(
        audit: Arc<dyn AuditLog>,
        settings: FetchSettings,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let engine = FetchEngine::with_connector(settings, connector, audit.clone());
        Self::with_engine(audit, engine)
    }

    fn with_engine(audit: Arc<dyn AuditLog>, engine: FetchEngine) -> Self {
        audit.log("API pool initialized", Level::Info);
        Self {
            registry: EndpointRegistry::new(audit.clone()),
            engine,
            reporter: ResultReporter::new(audit),
            last_run: None,
        }
    }

    pub fn add_endpoint(&mut self, url: &str) -> Result<(), InvalidUrlError> {
        self.registry.add(url)
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        self.registry.list()
    }

    /// Results of the most recent successful `run`, if any.
    pub fn last_run(&self) -> Option<&RunResult> {
        self.last_run.as_ref()
    }

    /// Fetches every endpoint and prints the report to stdout.
    ///
    /// Blocks the calling thread; from inside a Tokio runtime it fails with
    /// `TransportInitError::NestedRuntime`.
    pub fn run(&mut self) -> Result<&RunResult, PoolError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out)
    }

    /// Fetches every endpoint and writes the report to `out`. Each call starts
    /// from an empty result set.
    pub fn run_with_output<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<&RunResult, PoolError> {
        self.last_run = None;
        let results = self.engine.fetch_all_blocking(self.registry.list())?;
        engine_info!(
            "Run finished: {} endpoints, {} failed",
            results.len(),
            results.failures()
        );
        let results = self.last_run.insert(results);
        self.reporter.report(results, out)?;
        Ok(results)
    }
}

//! Pool engine: concurrent fetch, classification, reporting and the
//! `Pool` orchestrator that ties them to an endpoint registry.
mod engine;
mod pool;
mod report;
mod settings;
mod transport;

pub use engine::{FetchEngine, TransportInitError, TIMEOUT_DETAIL};
pub use pool::{Pool, PoolError};
pub use report::ResultReporter;
pub use settings::FetchSettings;
pub use transport::{
    Connector, FailureKind, RawResponse, ReqwestConnector, ReqwestTransport, Transport,
    TransportFailure,
};

// Re-exported so callers need only this crate.
pub use apipool_core::{DecodedValue, Endpoint, FetchOutcome, InvalidUrlError, RunResult};

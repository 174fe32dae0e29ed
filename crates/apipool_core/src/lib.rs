//! Pool core: endpoint registry, response validation/decoding and the
//! per-endpoint outcome model. No I/O beyond the injected audit log.
mod decode;
mod endpoint;
mod outcome;
mod registry;
mod run_result;
mod validate;

pub use decode::decode;
pub use endpoint::{Endpoint, InvalidUrlError};
pub use outcome::{DecodedValue, FetchOutcome, INVALID_RESPONSE};
pub use registry::EndpointRegistry;
pub use run_result::RunResult;
pub use validate::{declares_structured, is_acceptable, is_valid};

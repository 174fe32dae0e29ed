use std::io::{self, Write};
use std::sync::Arc;

use apipool_core::{FetchOutcome, RunResult};
use engine_logging::{AuditLog, Level};

/// Renders a run to a writer; failed endpoints are also written to the audit log.
pub struct ResultReporter {
    audit: Arc<dyn AuditLog>,
}

impl ResultReporter {
    pub fn new(audit: Arc<dyn AuditLog>) -> Self {
        Self { audit }
    }

    pub fn report<W: Write + ?Sized>(&self, results: &RunResult, out: &mut W) -> io::Result<()> {
        for (endpoint, outcome) in results.iter() {
            match outcome {
                FetchOutcome::Success(payload) => {
                    writeln!(out, "Response for {endpoint}: {}", payload.to_pretty())?;
                }
                failure => {
                    let line = format!("Error for {endpoint}: {failure}");
                    self.audit.log(&line, Level::Error);
                    writeln!(out, "{line}")?;
                }
            }
        }
        out.flush()
    }
}

use std::sync::Arc;

use engine_logging::{AuditLog, Level};

use crate::{Endpoint, InvalidUrlError};

/// Ordered list of endpoints accepted for fetching. Duplicates are kept.
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
    audit: Arc<dyn AuditLog>,
}

impl EndpointRegistry {
    pub fn new(audit: Arc<dyn AuditLog>) -> Self {
        Self {
            endpoints: Vec::new(),
            audit,
        }
    }

    /// Validates and appends `url`. Rejections are logged and returned; the
    /// list is left untouched.
    pub fn add(&mut self, url: &str) -> Result<(), InvalidUrlError> {
        match Endpoint::parse(url) {
            Ok(endpoint) => {
                self.endpoints.push(endpoint);
                self.audit.log(&format!("Added endpoint: {url}"), Level::Info);
                Ok(())
            }
            Err(err) => {
                self.audit
                    .log(&format!("Invalid URL provided: {url}"), Level::Error);
                Err(err)
            }
        }
    }

    pub fn list(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Budget for one request, from dispatch to the last body byte.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Upper bound on in-flight requests; `None` dispatches every endpoint at once.
    pub max_in_flight: Option<usize>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            max_in_flight: None,
        }
    }
}

use std::sync::Arc;

use apipool_engine::{
    Connector, FetchOutcome, FetchSettings, Pool, PoolError, Transport, TransportInitError,
};
use engine_logging::{Level, MemoryAuditLog};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts a mock server on a helper runtime so `Pool::run` can block freely.
fn start_server(routes: Vec<(&str, ResponseTemplate)>) -> (tokio::runtime::Runtime, MockServer) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        for (route, response) in routes {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(response)
                .mount(&server)
                .await;
        }
        server
    });
    (runtime, server)
}

fn pool() -> (Pool, Arc<MemoryAuditLog>) {
    engine_logging::initialize_for_tests();
    let audit = Arc::new(MemoryAuditLog::new());
    (Pool::new(audit.clone()), audit)
}

#[test]
fn construction_is_logged() {
    let (_pool, audit) = pool();
    assert_eq!(audit.messages_at(Level::Info), vec!["API pool initialized"]);
}

#[test]
fn rejected_url_leaves_endpoints_unchanged() {
    let (mut pool, audit) = pool();
    pool.add_endpoint("https://example.com/api").unwrap();
    assert!(pool.add_endpoint("not a url").is_err());

    let urls: Vec<_> = pool.endpoints().iter().map(|e| e.as_str()).collect();
    assert_eq!(urls, vec!["https://example.com/api"]);
    assert_eq!(
        audit.messages_at(Level::Error),
        vec!["Invalid URL provided: not a url"]
    );
}

#[test]
fn run_reports_every_endpoint_in_registration_order() {
    let (_runtime, server) = start_server(vec![
        (
            "/json",
            ResponseTemplate::new(200).set_body_raw(r#"{"a":1}"#, "application/json"),
        ),
        ("/gone", ResponseTemplate::new(410)),
        ("/text", ResponseTemplate::new(200).set_body_string("not json")),
    ]);
    let json_url = format!("{}/json", server.uri());
    let gone_url = format!("{}/gone", server.uri());
    let text_url = format!("{}/text", server.uri());

    let (mut pool, audit) = pool();
    pool.add_endpoint(&gone_url).unwrap();
    pool.add_endpoint(&json_url).unwrap();
    pool.add_endpoint(&text_url).unwrap();

    let mut out = Vec::new();
    let results = pool.run_with_output(&mut out).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results.get(&gone_url), Some(&FetchOutcome::HttpError(410)));

    let printed = String::from_utf8(out).unwrap();
    let expected = format!(
        "Error for {gone_url}: HTTP status code 410\n\
         Response for {json_url}: {{\n  \"a\": 1\n}}\n\
         Response for {text_url}: {{\n  \"raw\": \"not json\"\n}}\n"
    );
    assert_eq!(printed, expected);

    let errors = audit.messages_at(Level::Error);
    assert!(errors.contains(&format!("Error for {gone_url}: HTTP status code 410")));
    assert!(errors.contains(&format!(
        "Error fetching data from {gone_url}: HTTP status code 410"
    )));
}

#[test]
fn each_run_starts_from_an_empty_result_set() {
    let (_runtime, server) = start_server(vec![(
        "/ok",
        ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
    )]);
    let (mut pool, _audit) = pool();
    pool.add_endpoint(&format!("{}/ok", server.uri())).unwrap();

    let mut sink = Vec::new();
    let first = pool.run_with_output(&mut sink).unwrap().clone();
    pool.add_endpoint(&format!("{}/later", server.uri())).unwrap();
    let second = pool.run_with_output(&mut sink).unwrap().clone();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 2);
    assert_eq!(
        second.get(&format!("{}/later", server.uri())),
        Some(&FetchOutcome::HttpError(404))
    );
    assert_eq!(pool.last_run(), Some(&second));
}

#[test]
fn run_with_no_endpoints_prints_nothing() {
    let (mut pool, _audit) = pool();
    let mut out = Vec::new();
    assert!(pool.run_with_output(&mut out).unwrap().is_empty());
    assert!(out.is_empty());
}

struct BrokenConnector;

impl Connector for BrokenConnector {
    fn connect(&self, _settings: &FetchSettings) -> Result<Box<dyn Transport>, TransportInitError> {
        Err(TransportInitError::Client("resource exhaustion".to_string()))
    }
}

#[test]
fn transport_init_failure_surfaces_as_pool_error() {
    let audit = Arc::new(MemoryAuditLog::new());
    let mut pool = Pool::with_connector(
        audit.clone(),
        FetchSettings::default(),
        Arc::new(BrokenConnector),
    );
    pool.add_endpoint("https://example.com").unwrap();

    let mut out = Vec::new();
    let err = pool.run_with_output(&mut out).unwrap_err();
    assert!(matches!(err, PoolError::Transport(TransportInitError::Client(_))));
    assert!(pool.last_run().is_none());
    assert!(out.is_empty());
}

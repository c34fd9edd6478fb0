use std::sync::{Arc, Once};

use busbar_sf_jobs::SalesforceClient;
use wiremock::MockServer;

pub const JOB_ID: &str = "750R0000000zlh9IAA";
pub const ACCESS_TOKEN: &str = "00Dxx0000000001!AQ4AQFakeTokenForTests";

static TRACING: Once = Once::new();

/// Install a test-friendly subscriber once per binary.
///
/// Set `RUST_LOG=busbar_sf_bulk=debug` to see polling output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A mock org plus a session pointed at it.
pub async fn mock_org() -> (MockServer, Arc<SalesforceClient>) {
    init_tracing();
    let server = MockServer::start().await;
    let session = SalesforceClient::new(server.uri(), ACCESS_TOKEN)
        .expect("mock server URI should be a valid instance URL");
    (server, Arc::new(session))
}

/// Path of the job resource, optionally with a sub-resource.
pub fn job_path(suffix: &str) -> String {
    if suffix.is_empty() {
        format!("/services/data/v62.0/jobs/query/{JOB_ID}")
    } else {
        format!("/services/data/v62.0/jobs/query/{JOB_ID}/{suffix}")
    }
}

pub fn status_body(state: &str) -> serde_json::Value {
    serde_json::json!({
        "id": JOB_ID,
        "operation": "query",
        "object": "Account",
        "createdById": "005R0000000IUcWIAW",
        "createdDate": "2023-12-02T02:30:02.000+0000",
        "systemModstamp": "2023-12-02T02:30:09.000+0000",
        "state": state,
        "concurrencyMode": "Parallel",
        "contentType": "CSV",
        "apiVersion": 62.0,
        "jobType": "V2Query",
        "lineEnding": "LF",
        "columnDelimiter": "COMMA",
        "numberRecordsProcessed": 3,
        "retries": 0,
        "totalProcessingTime": 334
    })
}

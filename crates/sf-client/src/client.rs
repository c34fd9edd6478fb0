//! Core HTTP client with compression and request tracing.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::RequestBuilder;
use crate::response::Response;

/// HTTP client for Salesforce APIs.
///
/// Every request is sent once. Non-success statuses are returned as ordinary
/// responses so the caller can decide what the body means.
#[derive(Debug, Clone)]
pub struct SfHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SfHttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and hand back the response, whatever its status.
    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.url))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), request.full_url());

        if let Some(ref token) = request.bearer_token {
            req = req.bearer_auth(token);
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if self.config.enable_tracing {
            debug!("Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(Response::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestMethod;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> SfHttpClient {
        SfHttpClient::new(ClientConfig::builder().with_compression(false).build()).unwrap()
    }

    fn get(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = SfHttpClient::new(ClientConfig::default()).unwrap();
        assert!(client.config().accept_compressed);
    }

    #[tokio::test]
    async fn test_successful_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Accept", "text/csv"))
            .and(query_param("locator", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Id\n001"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client();
        let response = client
            .execute(
                get(format!("{}/test", mock_server.uri()))
                    .bearer_auth("test-token")
                    .accept("text/csv")
                    .query("locator", "abc"),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert!(!response.is_error());
        assert_eq!(response.text().await.unwrap(), "Id\n001");
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client();
        let response = client
            .execute(get(format!("{}/broken", mock_server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status(), 503);
        assert_eq!(response.status_line(), "503 Service Unavailable");
        assert_eq!(response.text().await.unwrap(), "maintenance");
    }

    #[tokio::test]
    async fn test_streamed_body_matches_content() {
        let mock_server = MockServer::start().await;
        let body = "Id,Name\n".to_string() + &"001xx000003DGb2AAG,Acme\n".repeat(2000);

        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
            .mount(&mock_server)
            .await;

        let client = test_client();
        let response = client
            .execute(get(format!("{}/big", mock_server.uri())))
            .await
            .unwrap();

        assert_eq!(response.content_length(), Some(body.len() as u64));
        let bytes = response.bytes().await.unwrap();
        assert_eq!(bytes.as_ref(), body.as_bytes());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Port 9 (discard) is not listening in test environments.
        let client = test_client();
        let err = client
            .execute(get("http://127.0.0.1:9/nothing"))
            .await
            .unwrap_err();

        assert!(err.is_connection() || matches!(err.kind, ErrorKind::Other(_)));
    }
}

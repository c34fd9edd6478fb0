//! HTTP response handling with Salesforce-specific extensions.

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};

use crate::error::Result;

/// Internal response wrapper that can hold either backend.
#[derive(Debug)]
enum InnerResponse {
    Native(reqwest::Response),
    Buffered(BufferedResponse),
}

/// A response whose status, headers and body are already in memory.
///
/// Produced by [`Response::from_parts`], typically by a `Transport`
/// implementation that does not talk to the network.
#[derive(Debug)]
struct BufferedResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl BufferedResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }
}

/// Wrapper around HTTP response with additional functionality.
#[derive(Debug)]
pub struct Response {
    inner: InnerResponse,
}

impl Response {
    /// Create a new Response from a reqwest::Response.
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self {
            inner: InnerResponse::Native(inner),
        }
    }

    /// Build a response from its parts.
    ///
    /// Header names are matched case-insensitively.
    pub fn from_parts<I, K, V>(status: u16, headers: I, body: impl Into<Bytes>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
            .collect();

        Self {
            inner: InnerResponse::Buffered(BufferedResponse {
                status,
                headers,
                body: body.into(),
            }),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        match &self.inner {
            InnerResponse::Native(resp) => resp.status().as_u16(),
            InnerResponse::Buffered(resp) => resp.status,
        }
    }

    /// The status line, e.g. `500 Internal Server Error`.
    pub fn status_line(&self) -> String {
        let status = self.status();
        match reqwest::StatusCode::from_u16(status) {
            Ok(code) => code.to_string(),
            Err(_) => status.to_string(),
        }
    }

    /// Returns true for any client or server error status (>= 400).
    pub fn is_error(&self) -> bool {
        self.status() >= 400
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        match &self.inner {
            InnerResponse::Native(resp) => resp.headers().get(name)?.to_str().ok(),
            InnerResponse::Buffered(resp) => resp.header(name),
        }
    }

    /// The declared body length, when the server sent one.
    pub fn content_length(&self) -> Option<u64> {
        match &self.inner {
            InnerResponse::Native(resp) => resp.content_length(),
            InnerResponse::Buffered(resp) => Some(resp.body.len() as u64),
        }
    }

    /// Get the Sforce-Locator header (used for Bulk API pagination).
    pub fn sforce_locator(&self) -> Option<&str> {
        self.header("sforce-locator")
    }

    /// Get the Sforce-NumberOfRecords header as sent, unparsed.
    pub fn sforce_number_of_records(&self) -> Option<&str> {
        self.header("sforce-numberofrecords")
    }

    /// Read the whole body, chunk by chunk.
    ///
    /// The buffer is sized up front from `Content-Length` when the server
    /// declares one, up to 64 MiB; larger bodies grow the
    /// buffer as chunks arrive.
    pub async fn bytes(self) -> Result<Bytes> {
        match self.inner {
            InnerResponse::Native(mut resp) => {
                let mut buf = BytesMut::with_capacity(initial_capacity(resp.content_length()));
                while let Some(chunk) = resp.chunk().await? {
                    buf.extend_from_slice(&chunk);
                }
                Ok(buf.freeze())
            }
            InnerResponse::Buffered(resp) => Ok(resp.body),
        }
    }

    /// Get the response body as text. Invalid UTF-8 is replaced, not rejected.
    pub async fn text(self) -> Result<String> {
        let body = self.bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

}

/// Upper bound on the buffer reserved from a declared `Content-Length`.
const MAX_PREALLOCATED_BODY: usize = 64 * 1024 * 1024;

/// Bytes to reserve for a body whose declared length is `content_length`.
fn initial_capacity(content_length: Option<u64>) -> usize {
    content_length
        .map(|len| usize::try_from(len).unwrap_or(usize::MAX))
        .unwrap_or(0)
        .min(MAX_PREALLOCATED_BODY)
}

/// Salesforce API error envelope.
///
/// Salesforce reports failures either as a JSON array of these objects or as a
/// single object; [`ApiError::parse`] accepts both and keeps the first entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ApiError {
    #[serde(alias = "errorCode")]
    pub error_code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl ApiError {
    /// Best-effort parse of an error body. Returns `None` when the body is not
    /// a recognizable error envelope.
    pub fn parse(body: &[u8]) -> Option<Self> {
        if let Ok(errors) = serde_json::from_slice::<Vec<ApiError>>(body) {
            return errors.into_iter().next();
        }
        serde_json::from_slice::<ApiError>(body).ok()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.error_code, self.message)
    }
}

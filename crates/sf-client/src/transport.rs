//! The capability job handles need from a session: build URLs, hand out the
//! bearer credential, and send a request.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::request::RequestBuilder;
use crate::response::Response;
use crate::salesforce_client::SalesforceClient;

/// An authenticated HTTP session shared by any number of callers.
///
/// `send` makes a single attempt and returns the response regardless of its
/// status; only failures to obtain a response at all are errors.
pub trait Transport: Send + Sync {
    /// Full URL for a path relative to the versioned REST API base,
    /// e.g. `jobs/query/750xx`.
    fn api_url(&self, path: &str) -> String;

    /// Bearer credential for the `Authorization` header.
    fn access_token(&self) -> &str;

    /// Send one request.
    fn send(&self, request: RequestBuilder) -> impl Future<Output = Result<Response>> + Send;
}

impl Transport for SalesforceClient {
    fn api_url(&self, path: &str) -> String {
        self.rest_url(path)
    }

    fn access_token(&self) -> &str {
        SalesforceClient::access_token(self)
    }

    fn send(&self, request: RequestBuilder) -> impl Future<Output = Result<Response>> + Send {
        self.execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn api_url(&self, path: &str) -> String {
        (**self).api_url(path)
    }

    fn access_token(&self) -> &str {
        (**self).access_token()
    }

    fn send(&self, request: RequestBuilder) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(request)
    }
}

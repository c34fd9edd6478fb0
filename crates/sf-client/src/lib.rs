//! # sf-client
//!
//! HTTP transport for Salesforce APIs.
//!
//! This crate provides the session layer that API-specific crates build on:
//! - Configurable connection pooling, timeouts and response compression
//! - Authenticated request building
//! - Responses that can be streamed from the network or built in memory
//! - The [`Transport`] trait, so job handles can run against a live org or a
//!   scripted stand-in
//! - Request/response tracing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (sf-bulk job handles, generic over Transport)              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Holds instance URL, access token, API version            │
//! │  - Implements Transport                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP, single attempt, compression, tracing           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_client::{RequestBuilder, RequestMethod, SalesforceClient, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_client::Error> {
//!     let client = SalesforceClient::new("https://myorg.my.salesforce.com", token)?;
//!
//!     let request = RequestBuilder::new(RequestMethod::Get, client.api_url("jobs/query/750xx0000000001"))
//!         .bearer_auth(client.access_token());
//!     let response = client.send(request).await?;
//!     println!("{}", response.status_line());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;
mod transport;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBuilder, RequestMethod};
pub use response::{ApiError, Response};
pub use salesforce_client::SalesforceClient;
pub use transport::Transport;

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-sf-jobs/", env!("CARGO_PKG_VERSION"));

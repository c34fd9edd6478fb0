//! # busbar-sf-bulk
//!
//! Lifecycle of Salesforce Bulk API 2.0 query jobs that already exist on the
//! server.
//!
//! ## Features
//!
//! - **Status Polling** - Fetch a job's state once, or wait until it finishes
//! - **Cancellation** - Waits stop promptly when a [`CancellationToken`] fires
//! - **Result Pagination** - CSV pages linked by `Sforce-Locator`
//! - **Job Deletion**
//! - **Timestamps** - Strict codec for the `2023-12-02T02:30:02.000+0000` format
//!
//! Job creation, ingest and auth are handled elsewhere; a handle only needs a
//! job ID and a [`Transport`](busbar_sf_client::Transport).
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use busbar_sf_bulk::{BulkJob, CancellationToken};
//! use busbar_sf_client::SalesforceClient;
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_bulk::Error> {
//!     let session = Arc::new(SalesforceClient::new(
//!         "https://myorg.my.salesforce.com",
//!         "access_token",
//!     )?);
//!
//!     let job = BulkJob::new(session, "750R0000000zlh9IAA");
//!     job.wait(&CancellationToken::new()).await?;
//!
//!     let pages: Vec<_> = job.result_pages().try_collect().await?;
//!     println!("{} rows", pages.iter().map(|p| p.rows).sum::<u64>());
//!
//!     job.delete().await?;
//!     Ok(())
//! }
//! ```

mod error;
mod job;
mod time;
mod types;

pub use error::{Error, ErrorKind, Result};
pub use job::{BulkJob, DEFAULT_POLL_INTERVAL};
pub use time::{SalesforceTime, TimeParseError};
pub use types::*;

pub use tokio_util::sync::CancellationToken;

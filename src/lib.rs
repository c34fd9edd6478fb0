//! # busbar-sf-jobs
//!
//! Track Salesforce Bulk API 2.0 query jobs that were created elsewhere:
//! poll status, wait for completion with cancellation, stream CSV result
//! pages, delete the job.
//!
//! ## Crates
//!
//! - **busbar-sf-client** - HTTP session: configuration, request building, the `Transport` trait
//! - **busbar-sf-bulk** - Job handle, job types, Salesforce timestamp codec
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use busbar_sf_jobs::{BulkJob, CancellationToken, SalesforceClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(SalesforceClient::new(instance_url, access_token)?);
//!     let job = BulkJob::new(session, job_id);
//!
//!     let status = job.wait_for_completion(&CancellationToken::new()).await?;
//!     println!("{} records processed", status.number_records_processed);
//!
//!     let mut locator: Option<String> = None;
//!     loop {
//!         let page = job.get_result_set(locator.as_deref()).await?;
//!         for record in page.records(job.info().column_delimiter)? {
//!             println!("{:?}", record);
//!         }
//!         match page.next {
//!             Some(next) => locator = Some(next),
//!             None => break,
//!         }
//!     }
//!
//!     job.delete().await?;
//!     Ok(())
//! }
//! ```

pub use busbar_sf_bulk as bulk;
pub use busbar_sf_client as client;

// Re-export commonly used types at the top level
pub use busbar_sf_bulk::{
    BulkJob, CancellationToken, JobInfo, JobState, JobStatus, ResultSet, SalesforceTime,
};
pub use busbar_sf_client::{ClientConfig, SalesforceClient, Transport};

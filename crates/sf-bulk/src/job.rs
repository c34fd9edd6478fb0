//! Handle for one Bulk API 2.0 query job.
//!
//! Wraps a job ID and a shared [`Transport`] and exposes the lifecycle the
//! server supports once a job exists: poll its status, wait for a terminal
//! state, page through results, delete it.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, Stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use busbar_sf_client::{ApiError, RequestBuilder, RequestMethod, Response, Transport};

use crate::error::{Error, ErrorKind, Result};
use crate::types::{JobInfo, JobStatus, ResultSet};

/// Default polling interval for job status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// A Bulk API 2.0 query job.
///
/// Cheap to clone; clones share the transport.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use busbar_sf_bulk::BulkJob;
/// use busbar_sf_client::SalesforceClient;
/// use tokio_util::sync::CancellationToken;
///
/// let session = Arc::new(SalesforceClient::new(instance_url, access_token)?);
/// let job = BulkJob::new(session, "750R0000000zlh9IAA");
///
/// job.wait(&CancellationToken::new()).await?;
///
/// let mut locator: Option<String> = None;
/// loop {
///     let page = job.get_result_set(locator.as_deref()).await?;
///     handle(&page.body);
///     match page.next {
///         Some(next) => locator = Some(next),
///         None => break,
///     }
/// }
///
/// job.delete().await?;
/// ```
#[derive(Debug)]
pub struct BulkJob<T> {
    transport: Arc<T>,
    info: JobInfo,
    poll_interval: Duration,
    max_records: Option<u32>,
}

impl<T> Clone for BulkJob<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            info: self.info.clone(),
            poll_interval: self.poll_interval,
            max_records: self.max_records,
        }
    }
}

impl<T: Transport> BulkJob<T> {
    /// Handle for an existing job known by ID.
    pub fn new(transport: Arc<T>, id: impl Into<String>) -> Self {
        Self::from_info(transport, JobInfo::from_id(id))
    }

    /// Handle for a job whose metadata has already been fetched.
    pub fn from_info(transport: Arc<T>, info: JobInfo) -> Self {
        Self {
            transport,
            info,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_records: None,
        }
    }

    /// Set the polling interval for [`wait`](Self::wait).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Ask the server for at most `max` rows per result page.
    pub fn with_max_records(mut self, max: u32) -> Self {
        self.max_records = Some(max);
        self
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn info(&self) -> &JobInfo {
        &self.info
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn job_url(&self) -> String {
        self.transport.api_url(&format!("jobs/query/{}", self.info.id))
    }

    fn request(&self, url: String) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url).bearer_auth(self.transport.access_token())
    }

    /// Fetch the current status once.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn get_status(&self) -> Result<JobStatus> {
        let response = self.transport.send(self.request(self.job_url())).await?;
        let status = response.status();
        let body = response.bytes().await?;

        serde_json::from_slice::<JobStatus>(&body).map_err(|err| {
            Error::with_source(
                ErrorKind::Decode {
                    what: "job status",
                    status,
                    api_error: ApiError::parse(&body),
                    message: err.to_string(),
                },
                err,
            )
        })
    }

    /// Poll until the job finishes.
    ///
    /// Returns `Ok(())` for `JobComplete`, a job-outcome error for `Aborted`
    /// or `Failed`, and [`ErrorKind::Cancelled`] once `cancel` fires. The token
    /// is checked before every poll and during the sleep between polls; a
    /// status request already in flight is allowed to finish.
    pub async fn wait(&self, cancel: &CancellationToken) -> Result<()> {
        self.wait_for_completion(cancel).await.map(|_| ())
    }

    /// Like [`wait`](Self::wait), but hands back the final status on success.
    #[instrument(skip(self, cancel), fields(job_id = %self.info.id))]
    pub async fn wait_for_completion(&self, cancel: &CancellationToken) -> Result<JobStatus> {
        loop {
            if cancel.is_cancelled() {
                return Err(Error::new(ErrorKind::Cancelled));
            }

            let status = self.get_status().await?;
            debug!(
                state = %status.state,
                records = status.number_records_processed,
                retries = status.retries,
                "Polled job status"
            );

            if status.state.is_finished() {
                return match status.state.to_error() {
                    Some(err) => Err(err),
                    None => Ok(status),
                };
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::new(ErrorKind::Cancelled)),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Fetch one page of CSV results.
    ///
    /// Pass `None` (or an empty locator) for the first page and the previous
    /// page's [`ResultSet::next`] afterwards.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn get_result_set(&self, locator: Option<&str>) -> Result<ResultSet> {
        let mut request = self
            .request(format!("{}/results", self.job_url()))
            .content_type("application/json")
            .accept("text/csv");

        if let Some(loc) = locator.filter(|l| !l.is_empty()) {
            request = request.query("locator", loc);
        }
        if let Some(max) = self.max_records {
            request = request.query("maxRecords", max.to_string());
        }

        let response = self.transport.send(request).await?;
        let response = check_status(response, "failed to get result set from bulk job").await?;

        // A bad row count never fails the page.
        let rows = response
            .sforce_number_of_records()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);

        // Salesforce sends the literal string "null" on the last page.
        let next = response
            .sforce_locator()
            .filter(|s| !s.is_empty() && *s != "null")
            .map(str::to_string);

        let body: Bytes = response.bytes().await?;
        debug!(rows, bytes = body.len(), has_next = next.is_some(), "Fetched result page");

        Ok(ResultSet { body, next, rows })
    }

    /// Pages of results, following locators until the last page.
    ///
    /// The stream ends after the first error.
    pub fn result_pages(&self) -> impl Stream<Item = Result<ResultSet>> + '_ {
        stream::try_unfold(Some(None::<String>), move |cursor| async move {
            let Some(locator) = cursor else {
                return Ok(None);
            };
            self.get_result_set(locator.as_deref()).await.map(|page| {
                let cursor = page.next.clone().map(Some);
                Some((page, cursor))
            })
        })
    }

    /// Delete the job on the server.
    ///
    /// Sent as a GET to the job's own URL, matching what the existing
    /// integration expects. Nothing is cached client side, so repeated calls
    /// simply repeat the request.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn delete(&self) -> Result<()> {
        let request = self.request(self.job_url()).content_type("application/json");
        let response = self.transport.send(request).await?;
        check_status(response, "failed to delete bulk job").await?;
        Ok(())
    }
}

/// Turn a status >= 400 into an error carrying the status line and raw body.
async fn check_status(response: Response, context: &'static str) -> Result<Response> {
    if !response.is_error() {
        return Ok(response);
    }

    let status = response.status();
    let status_line = response.status_line();
    let body = response.text().await.unwrap_or_default();
    Err(Error::new(ErrorKind::Http {
        context,
        status,
        status_line,
        body,
    }))
}

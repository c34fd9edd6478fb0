//! Types for Bulk API 2.0 query jobs.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::time::SalesforceTime;

/// Deserialize API version that can be either a float (59.0) or string ("59.0").
pub(crate) fn deserialize_api_version<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ApiVersion {
        Float(f64),
        String(String),
    }

    Option::<ApiVersion>::deserialize(deserializer).map(|opt| {
        opt.map(|v| match v {
            ApiVersion::Float(f) => format!("{:.1}", f),
            ApiVersion::String(s) => s,
        })
    })
}

/// Bulk API 2.0 query job states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    /// Job has been accepted and is queued for processing
    UploadComplete,
    /// Job is processing
    InProgress,
    /// Job was aborted
    Aborted,
    /// Job completed successfully
    JobComplete,
    /// Job failed
    Failed,
}

impl JobState {
    /// Check if job is in a terminal state.
    pub fn is_finished(&self) -> bool {
        match self {
            JobState::UploadComplete | JobState::InProgress => false,
            JobState::Aborted | JobState::JobComplete | JobState::Failed => true,
        }
    }

    /// The error a finished job reports, if its outcome was not a success.
    pub fn to_error(&self) -> Option<Error> {
        match self {
            JobState::Aborted => Some(Error::new(ErrorKind::JobAborted)),
            JobState::Failed => Some(Error::new(ErrorKind::JobFailed)),
            JobState::UploadComplete | JobState::InProgress | JobState::JobComplete => None,
        }
    }

    /// Get the API string for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::UploadComplete => "UploadComplete",
            JobState::InProgress => "InProgress",
            JobState::Aborted => "Aborted",
            JobState::JobComplete => "JobComplete",
            JobState::Failed => "Failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line ending style for Bulk API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineEnding {
    /// Unix-style (LF)
    #[default]
    #[serde(rename = "LF")]
    Lf,
    /// Windows-style (CRLF)
    #[serde(rename = "CRLF")]
    Crlf,
}

/// Column delimiter for Bulk API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColumnDelimiter {
    #[default]
    #[serde(rename = "COMMA")]
    Comma,
    #[serde(rename = "TAB")]
    Tab,
    #[serde(rename = "SEMICOLON")]
    Semicolon,
    #[serde(rename = "PIPE")]
    Pipe,
    #[serde(rename = "BACKQUOTE")]
    Backquote,
    #[serde(rename = "CARET")]
    Caret,
}

impl ColumnDelimiter {
    /// Get the actual delimiter byte.
    pub fn byte(&self) -> u8 {
        match self {
            ColumnDelimiter::Comma => b',',
            ColumnDelimiter::Tab => b'\t',
            ColumnDelimiter::Semicolon => b';',
            ColumnDelimiter::Pipe => b'|',
            ColumnDelimiter::Backquote => b'`',
            ColumnDelimiter::Caret => b'^',
        }
    }
}

/// Point-in-time status of a job. A new one is produced on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    /// Current state
    pub state: JobState,
    /// Number of records processed so far
    #[serde(default)]
    pub number_records_processed: i64,
    /// Number of times Salesforce retried the job
    #[serde(default)]
    pub retries: i64,
    /// Total processing time in milliseconds
    #[serde(default, rename = "totalProcessingTime")]
    pub total_processing_time_ms: i64,
}

impl JobStatus {
    /// Total processing time; negative values read as zero.
    pub fn processing_time(&self) -> Duration {
        Duration::from_millis(self.total_processing_time_ms.max(0) as u64)
    }
}

/// Descriptive metadata of a query job, as returned when the job is created
/// or fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    /// Job ID
    pub id: String,
    /// Operation type (`query` or `queryAll`)
    #[serde(default)]
    pub operation: String,
    /// SObject the query targets
    #[serde(default)]
    pub object: String,
    /// User who created the job
    #[serde(default)]
    pub created_by_id: String,
    /// Job creation time
    #[serde(default)]
    pub created_date: SalesforceTime,
    /// Last modification time
    #[serde(default)]
    pub system_modstamp: SalesforceTime,
    /// State at the time this metadata was fetched
    #[serde(default = "default_state")]
    pub state: JobState,
    /// Concurrency mode
    #[serde(default)]
    pub concurrency_mode: String,
    /// Content type of results (always `CSV` today)
    #[serde(default)]
    pub content_type: String,
    /// API version (can be float like 59.0 or string like "59.0")
    #[serde(default, deserialize_with = "deserialize_api_version")]
    pub api_version: Option<String>,
    /// Line ending used in result pages
    #[serde(default)]
    pub line_ending: LineEnding,
    /// Column delimiter used in result pages
    #[serde(default)]
    pub column_delimiter: ColumnDelimiter,
}

fn default_state() -> JobState {
    JobState::UploadComplete
}

impl JobInfo {
    /// Metadata for a job known only by its ID.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operation: String::new(),
            object: String::new(),
            created_by_id: String::new(),
            created_date: SalesforceTime::default(),
            system_modstamp: SalesforceTime::default(),
            state: default_state(),
            concurrency_mode: String::new(),
            content_type: String::new(),
            api_version: None,
            line_ending: LineEnding::default(),
            column_delimiter: ColumnDelimiter::default(),
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone)]
pub struct ResultSet {
    /// Raw CSV body of this page
    pub body: Bytes,
    /// Locator for the next page (None if no more pages)
    pub next: Option<String>,
    /// Rows in this page as reported by Salesforce; 0 when not reported
    pub rows: u64,
}

impl ResultSet {
    /// True when another page follows this one.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// A CSV reader over this page. The first row is treated as headers.
    pub fn reader(&self, delimiter: ColumnDelimiter) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .delimiter(delimiter.byte())
            .from_reader(self.body.as_ref())
    }

    /// Header row of this page.
    pub fn headers(&self, delimiter: ColumnDelimiter) -> Result<csv::StringRecord> {
        Ok(self.reader(delimiter).headers()?.clone())
    }

    /// All data rows of this page.
    pub fn records(&self, delimiter: ColumnDelimiter) -> Result<Vec<csv::StringRecord>> {
        self.reader(delimiter)
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

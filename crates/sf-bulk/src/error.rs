//! Error types for sf-bulk.

use busbar_sf_client::ApiError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// The caller cancelled a wait; says nothing about the job itself.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }

    /// The job reached a terminal state other than `JobComplete`.
    pub fn is_job_outcome(&self) -> bool {
        matches!(self.kind, ErrorKind::JobAborted | ErrorKind::JobFailed)
    }

    /// HTTP status attached to the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Http { status, .. } => Some(*status),
            ErrorKind::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// No response was obtained (connection, timeout, invalid request).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body could not be decoded. Carries whatever Salesforce
    /// error envelope could be recovered from the same body.
    #[error(
        "failed to decode {what} (HTTP {status}){}: {message}",
        api_error.as_ref().map(|e| format!(" [{e}]")).unwrap_or_default()
    )]
    Decode {
        what: &'static str,
        status: u16,
        api_error: Option<ApiError>,
        message: String,
    },

    /// The server answered with a status >= 400.
    #[error("{context}: {status_line} body({body})")]
    Http {
        context: &'static str,
        status: u16,
        status_line: String,
        body: String,
    },

    #[error("job aborted")]
    JobAborted,

    #[error("job failed")]
    JobFailed,

    #[error("wait cancelled")]
    Cancelled,

    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<busbar_sf_client::Error> for Error {
    fn from(err: busbar_sf_client::Error) -> Self {
        Error::with_source(ErrorKind::Transport(err.to_string()), err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::with_source(ErrorKind::Csv(err.to_string()), err)
    }
}

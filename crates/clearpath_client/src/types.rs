use std::fmt;

use clearpath_core::{EntityDetail, Epoch, JobId, JobMetadata, MatchRef, SearchResponse};

use crate::sse::SseFrame;

/// Results reported back from the background runtime. Job-scoped events
/// echo the epoch of the effect that started them.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    SearchSubmitted(Result<SearchResponse, ApiError>),
    StreamFrame {
        job_id: JobId,
        epoch: Epoch,
        frame: SseFrame,
    },
    StreamFailed {
        job_id: JobId,
        epoch: Epoch,
        reason: String,
    },
    JobMetadata {
        job_id: JobId,
        epoch: Epoch,
        result: Result<JobMetadata, ApiError>,
    },
    DetailResolved {
        job_id: JobId,
        epoch: Epoch,
        row: MatchRef,
        detail: EntityDetail,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Text suitable for showing to the user: the server's `detail` when it
    /// sent one, otherwise a short description of the failure.
    pub fn user_message(&self) -> String {
        match &self.kind {
            FailureKind::Rejected { detail, .. } => detail.clone(),
            kind => kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    /// Non-2xx response carrying a `{detail}` message.
    Rejected { status: u16, detail: String },
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Rejected { status, detail } => {
                write!(f, "rejected with status {status}: {detail}")
            }
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
        }
    }
}

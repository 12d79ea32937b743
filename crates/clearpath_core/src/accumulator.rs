//! Result accumulator: folds named stream events for one job into an
//! append-only result list, the latest trademark result and a terminal
//! status.

use clearpath_logging::{cp_debug, cp_info, cp_warn};
use serde::Deserialize;

use crate::{JobId, JobStreamStatus, StateResult, UsptoResult};

pub const EVENT_STATE_RESULT: &str = "state_result";
pub const EVENT_USPTO_RESULT: &str = "uspto_result";
pub const EVENT_DONE: &str = "done";
/// Emitted by the backend when the job cannot be streamed. Event-source
/// clients route it to their error handler, so it is a transport failure.
pub const EVENT_ERROR: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Connection {
    #[default]
    Idle,
    Open,
    Closed,
}

/// What a single ingested event did to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    Appended,
    UsptoReplaced,
    /// Stream reached a terminal status; the connection is now closed.
    Finished(JobStreamStatus),
    /// Payload could not be parsed; nothing changed.
    Dropped,
    /// Event arrived while not subscribed, or has an unknown name.
    Ignored,
}

impl Ingest {
    pub fn changed_state(self) -> bool {
        matches!(
            self,
            Ingest::Appended | Ingest::UsptoReplaced | Ingest::Finished(_)
        )
    }
}

#[derive(Debug, Deserialize)]
struct DonePayload {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultAccumulator {
    job_id: JobId,
    results: Vec<StateResult>,
    uspto: Option<UsptoResult>,
    status: JobStreamStatus,
    connection: Connection,
}

impl ResultAccumulator {
    pub fn new(job_id: impl Into<JobId>) -> Self {
        Self {
            job_id: job_id.into(),
            ..Self::default()
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn results(&self) -> &[StateResult] {
        &self.results
    }

    pub fn uspto(&self) -> Option<&UsptoResult> {
        self.uspto.as_ref()
    }

    pub fn status(&self) -> JobStreamStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.connection == Connection::Open
    }

    /// Marks the single stream connection as open. Returns false when the job
    /// id is blank or this accumulator was already subscribed once.
    pub fn subscribe(&mut self) -> bool {
        if self.job_id.trim().is_empty() {
            cp_warn!("Refusing to subscribe with an empty job id");
            return false;
        }
        if self.connection != Connection::Idle {
            return false;
        }
        self.connection = Connection::Open;
        cp_info!("Subscribed to job {}", self.job_id);
        true
    }

    /// Closes the connection regardless of status. Returns true if it was
    /// open, i.e. the caller still has a live connection to tear down.
    pub fn unsubscribe(&mut self) -> bool {
        let was_open = self.is_open();
        if self.connection != Connection::Closed {
            self.connection = Connection::Closed;
        }
        if was_open {
            cp_info!("Unsubscribed from job {}", self.job_id);
        }
        was_open
    }

    /// Dispatches one named event to its handler.
    pub fn ingest(&mut self, event: &str, data: &str) -> Ingest {
        if !self.is_open() {
            cp_debug!(
                "Job {}: ignoring '{}' event after connection closed",
                self.job_id,
                event
            );
            return Ingest::Ignored;
        }
        match event {
            EVENT_STATE_RESULT => self.on_state_result(data),
            EVENT_USPTO_RESULT => self.on_uspto_result(data),
            EVENT_DONE => self.on_done(data),
            EVENT_ERROR => self.on_transport_error(data),
            other => {
                cp_debug!("Job {}: ignoring unknown event '{}'", self.job_id, other);
                Ingest::Ignored
            }
        }
    }

    fn on_state_result(&mut self, data: &str) -> Ingest {
        match serde_json::from_str::<StateResult>(data) {
            Ok(mut result) => {
                if !result.confidence.is_finite() {
                    result.confidence = 0.0;
                }
                result.confidence = result.confidence.clamp(0.0, 1.0);
                self.results.push(result);
                Ingest::Appended
            }
            Err(err) => {
                cp_warn!(
                    "Job {}: dropping malformed state_result: {}",
                    self.job_id,
                    err
                );
                Ingest::Dropped
            }
        }
    }

    fn on_uspto_result(&mut self, data: &str) -> Ingest {
        match serde_json::from_str::<UsptoResult>(data) {
            Ok(result) => {
                self.uspto = Some(result);
                Ingest::UsptoReplaced
            }
            Err(err) => {
                cp_warn!(
                    "Job {}: dropping malformed uspto_result: {}",
                    self.job_id,
                    err
                );
                Ingest::Dropped
            }
        }
    }

    fn on_done(&mut self, data: &str) -> Ingest {
        // A garbled `done` still ends the stream; only an explicit error
        // status marks the job failed.
        let explicit_error = match serde_json::from_str::<DonePayload>(data) {
            Ok(payload) => payload.status.as_deref() == Some("error"),
            Err(err) => {
                cp_warn!("Job {}: malformed done payload: {}", self.job_id, err);
                false
            }
        };
        let status = if explicit_error {
            JobStreamStatus::Error
        } else {
            JobStreamStatus::Complete
        };
        self.finish(status)
    }

    /// Connection dropped or the stream was unreadable. No reconnect.
    pub fn on_transport_error(&mut self, reason: &str) -> Ingest {
        if !self.is_open() {
            return Ingest::Ignored;
        }
        cp_warn!("Job {}: stream failed: {}", self.job_id, reason);
        self.finish(JobStreamStatus::Error)
    }

    fn finish(&mut self, status: JobStreamStatus) -> Ingest {
        self.status = status;
        self.connection = Connection::Closed;
        cp_info!(
            "Job {} finished with {:?} after {} state results",
            self.job_id,
            status,
            self.results.len()
        );
        Ingest::Finished(status)
    }
}

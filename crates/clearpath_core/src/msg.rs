use crate::{EntityDetail, Epoch, JobId, JobMetadata, MatchRef};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the search form on the home route.
    FormEdited {
        name: String,
        entity_type: String,
        states: Vec<String>,
    },
    /// User submitted the search form.
    SearchSubmitted,
    /// Submission endpoint created a job.
    SearchAccepted {
        job_id: JobId,
        states_queued: Vec<String>,
    },
    /// Submission endpoint rejected the request or was unreachable.
    SearchRejected { message: String },
    /// Navigated to the results route for a job.
    ResultsOpened { job_id: JobId },
    /// Results view torn down (user navigated away).
    ResultsClosed,
    /// One named event from the job's result stream.
    StreamEvent {
        job_id: JobId,
        epoch: Epoch,
        event: String,
        data: String,
    },
    /// Stream connection dropped or became unreadable.
    StreamFailed {
        job_id: JobId,
        epoch: Epoch,
        reason: String,
    },
    JobMetadataLoaded {
        job_id: JobId,
        epoch: Epoch,
        metadata: JobMetadata,
    },
    JobMetadataFailed {
        job_id: JobId,
        epoch: Epoch,
        message: String,
    },
    /// User expanded or collapsed a match row.
    MatchToggled { row: MatchRef },
    /// Entity detail fetch for a match row resolved (successfully or with a
    /// synthesized error record).
    DetailLoaded {
        job_id: JobId,
        epoch: Epoch,
        row: MatchRef,
        detail: EntityDetail,
    },
    /// Render tick.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

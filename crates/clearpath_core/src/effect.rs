use crate::{DetailKey, Epoch, JobId, MatchRef, SearchRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitSearch(SearchRequest),
    /// Results for this subscription are reported back tagged with `epoch`.
    OpenStream { job_id: JobId, epoch: Epoch },
    CloseStream { job_id: JobId },
    FetchJobMetadata { job_id: JobId, epoch: Epoch },
    FetchDetail {
        job_id: JobId,
        epoch: Epoch,
        row: MatchRef,
        key: DetailKey,
    },
}

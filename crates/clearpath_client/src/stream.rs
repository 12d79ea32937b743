use clearpath_core::{Epoch, JobId, EVENT_DONE, EVENT_ERROR};
use clearpath_logging::{cp_debug, cp_info, cp_warn};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio_util::sync::CancellationToken;

use crate::api::{map_reqwest_error, ReqwestApi};
use crate::sse::SseDecoder;
use crate::{ClientEvent, EventSink};

/// Reads the job's result stream until a terminal frame, a transport failure
/// or cancellation. Exactly one terminal outcome is reported: either a
/// `done`/`error` frame or a `StreamFailed` event. Cancellation reports
/// nothing.
pub async fn run_stream(
    api: &ReqwestApi,
    job_id: JobId,
    epoch: Epoch,
    sink: &dyn EventSink,
    cancel: CancellationToken,
) {
    let url = api.stream_url(&job_id);
    cp_info!("Opening result stream {}", url);

    let request = api
        .stream_client()
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .send();
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            cp_debug!("Job {}: stream cancelled before connecting", job_id);
            return;
        }
        response = request => response,
    };

    let response = match response {
        Ok(response) => response,
        Err(err) => {
            let reason = map_reqwest_error(err).to_string();
            sink.emit(ClientEvent::StreamFailed {
                job_id,
                epoch,
                reason,
            });
            return;
        }
    };
    let status = response.status();
    if !status.is_success() {
        sink.emit(ClientEvent::StreamFailed {
            job_id,
            epoch,
            reason: format!("http status {}", status.as_u16()),
        });
        return;
    }

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                cp_debug!("Job {}: stream cancelled", job_id);
                return;
            }
            next = body.next() => next,
        };
        let chunk = match next {
            Some(Ok(chunk)) => chunk,
            Some(Err(err)) => {
                let reason = map_reqwest_error(err).to_string();
                cp_warn!("Job {}: stream read failed: {}", job_id, reason);
                sink.emit(ClientEvent::StreamFailed {
                    job_id,
                    epoch,
                    reason,
                });
                return;
            }
            None => {
                sink.emit(ClientEvent::StreamFailed {
                    job_id,
                    epoch,
                    reason: "stream ended before done".to_string(),
                });
                return;
            }
        };
        for frame in decoder.feed(&chunk) {
            let terminal = frame.event == EVENT_DONE || frame.event == EVENT_ERROR;
            sink.emit(ClientEvent::StreamFrame {
                job_id: job_id.clone(),
                epoch,
                frame,
            });
            if terminal {
                cp_debug!("Job {}: terminal frame received, closing stream", job_id);
                return;
            }
        }
    }
}

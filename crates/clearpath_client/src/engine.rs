use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use clearpath_core::{DetailKey, Effect, Epoch, JobId, MatchRef, SearchRequest};
use clearpath_logging::{cp_debug, cp_info};
use tokio_util::sync::CancellationToken;

use crate::api::{ReqwestApi, SearchApi};
use crate::detail_cache::DetailCache;
use crate::stream::run_stream;
use crate::{ApiError, ClientEvent, ClientSettings};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Submit(SearchRequest),
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

impl From<Effect> for EngineCommand {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::SubmitSearch(request) => EngineCommand::Submit(request),
            Effect::OpenStream { job_id, epoch } => {
                EngineCommand::OpenStream { job_id, epoch }
            }
            Effect::CloseStream { job_id } => EngineCommand::CloseStream { job_id },
            Effect::FetchJobMetadata { job_id, epoch } => {
                EngineCommand::FetchJobMetadata { job_id, epoch }
            }
            Effect::FetchDetail {
                job_id,
                epoch,
                row,
                key,
            } => EngineCommand::FetchDetail {
                job_id,
                epoch,
                row,
                key,
            },
        }
    }
}

/// Executes core effects on a background tokio runtime and reports the
/// outcomes as [`ClientEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let api = Arc::new(ReqwestApi::new(&settings)?);
        let cache = Arc::new(DetailCache::new(api.clone(), settings.failure_policy));
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut streams: HashMap<JobId, CancellationToken> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                let sink = ChannelSink::new(event_tx.clone());
                match command {
                    EngineCommand::OpenStream { job_id, epoch } => {
                        if streams.contains_key(&job_id) {
                            cp_debug!("Job {}: stream already open", job_id);
                            continue;
                        }
                        let cancel = CancellationToken::new();
                        streams.insert(job_id.clone(), cancel.clone());
                        let api = api.clone();
                        runtime.spawn(async move {
                            run_stream(api.as_ref(), job_id, epoch, &sink, cancel).await;
                        });
                    }
                    EngineCommand::CloseStream { job_id } => {
                        if let Some(cancel) = streams.remove(&job_id) {
                            cp_info!("Job {}: closing result stream", job_id);
                            cancel.cancel();
                        }
                    }
                    other => {
                        let api = api.clone();
                        let cache = cache.clone();
                        runtime.spawn(async move {
                            handle_request(api.as_ref(), cache.as_ref(), other, &sink).await;
                        });
                    }
                }
            }
            for cancel in streams.into_values() {
                cancel.cancel();
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn execute(&self, effect: Effect) {
        let _ = self.cmd_tx.send(effect.into());
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_request(
    api: &dyn SearchApi,
    cache: &DetailCache,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Submit(request) => {
            let result = api.submit_search(&request).await;
            sink.emit(ClientEvent::SearchSubmitted(result));
        }
        EngineCommand::FetchJobMetadata { job_id, epoch } => {
            let result = api.job_metadata(&job_id).await;
            sink.emit(ClientEvent::JobMetadata {
                job_id,
                epoch,
                result,
            });
        }
        EngineCommand::FetchDetail {
            job_id,
            epoch,
            row,
            key,
        } => {
            let detail = cache.get_or_fetch(&key).await;
            sink.emit(ClientEvent::DetailResolved {
                job_id,
                epoch,
                row,
                detail,
            });
        }
        EngineCommand::OpenStream { .. } | EngineCommand::CloseStream { .. } => {}
    }
}

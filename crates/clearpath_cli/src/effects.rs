use std::time::Duration;

use clearpath_client::{ApiError, ClientEvent, ClientSettings, EngineHandle};
use clearpath_core::{Effect, Msg};
use clearpath_logging::{cp_debug, cp_info};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        cp_info!("Using backend {}", settings.base_url);
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            cp_debug!("Executing {:?}", effect);
            self.engine.execute(effect);
        }
    }

    /// Waits up to `timeout` for the next engine result.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(to_msg)
    }
}

pub fn to_msg(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::SearchSubmitted(Ok(response)) => Msg::SearchAccepted {
            job_id: response.job_id,
            states_queued: response.states_queued,
        },
        ClientEvent::SearchSubmitted(Err(err)) => Msg::SearchRejected {
            message: err.user_message(),
        },
        ClientEvent::StreamFrame {
            job_id,
            epoch,
            frame,
        } => Msg::StreamEvent {
            job_id,
            epoch,
            event: frame.event,
            data: frame.data,
        },
        ClientEvent::StreamFailed {
            job_id,
            epoch,
            reason,
        } => Msg::StreamFailed {
            job_id,
            epoch,
            reason,
        },
        ClientEvent::JobMetadata {
            job_id,
            epoch,
            result: Ok(metadata),
        } => Msg::JobMetadataLoaded {
            job_id,
            epoch,
            metadata,
        },
        ClientEvent::JobMetadata {
            job_id,
            epoch,
            result: Err(err),
        } => Msg::JobMetadataFailed {
            job_id,
            epoch,
            message: err.to_string(),
        },
        ClientEvent::DetailResolved {
            job_id,
            epoch,
            row,
            detail,
        } => Msg::DetailLoaded {
            job_id,
            epoch,
            row,
            detail,
        },
    }
}

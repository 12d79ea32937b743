//! Clear Path client: HTTP endpoints, the result stream subscription, the
//! entity detail cache and the background engine that runs core effects.
mod api;
mod detail_cache;
mod engine;
mod settings;
mod sse;
mod stream;
mod types;

pub use api::{ReqwestApi, SearchApi};
pub use detail_cache::DetailCache;
pub use engine::{ChannelSink, EngineHandle, EventSink};
pub use settings::{ClientSettings, FailurePolicy};
pub use sse::{SseDecoder, SseFrame};
pub use stream::run_stream;
pub use types::{ApiError, ClientEvent, FailureKind};

//! Clear Path core: pure state machine for streaming name-availability
//! results and the view-model projections rendered from it.
mod accumulator;
mod effect;
mod expansion;
mod msg;
mod state;
mod summary;
mod types;
mod update;
mod view_model;

pub use accumulator::{
    Ingest, ResultAccumulator, EVENT_DONE, EVENT_ERROR, EVENT_STATE_RESULT, EVENT_USPTO_RESULT,
};
pub use effect::Effect;
pub use expansion::{MatchExpansion, MatchRef};
pub use msg::Msg;
pub use state::{AppState, ResultsPage, Route, SearchForm};
pub use summary::{project, Summary};
pub use types::{
    Availability, DetailKey, EntityDetail, Epoch, JobId, JobMetadata, JobStreamStatus, RawMatch,
    RiskLevel, SearchRequest, SearchResponse, StateResult, TrademarkMark, UsptoResult,
    ENTITY_TYPES,
};
pub use update::update;
pub use view_model::{
    AppViewModel, CardView, FormView, MatchRowView, ResultsView, RouteView, StateCardView,
    TrademarkCardView,
};

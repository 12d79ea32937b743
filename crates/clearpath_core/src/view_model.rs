use crate::state::{ResultsPage, SearchForm};
use crate::summary::{project, Summary};
use crate::{
    Availability, EntityDetail, JobId, JobStreamStatus, MatchRef, RiskLevel, TrademarkMark,
    ENTITY_TYPES,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub route: RouteView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteView {
    Home(FormView),
    Results(ResultsView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub name: String,
    pub entity_type: String,
    pub states: Vec<String>,
    pub entity_types: &'static [&'static str],
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub job_id: JobId,
    /// `None` until job metadata loads; renderers show a placeholder.
    pub search_name: Option<String>,
    pub entity_type: Option<String>,
    pub status: JobStreamStatus,
    pub status_label: &'static str,
    pub summary: Summary,
    /// Trademark card first, then state cards in arrival order.
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    Trademark(TrademarkCardView),
    State(StateCardView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrademarkCardView {
    pub risk: RiskLevel,
    pub exact_matches: Vec<TrademarkMark>,
    pub similar_marks: Vec<TrademarkMark>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCardView {
    pub state_code: String,
    pub state_name: String,
    pub availability: Availability,
    pub confidence_percent: u8,
    pub similar_names: Vec<String>,
    pub flags: Vec<String>,
    pub notes: String,
    pub matches: Vec<MatchRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRowView {
    pub row: MatchRef,
    pub name: Option<String>,
    pub file_number: Option<String>,
    pub expanded: bool,
    pub loading: bool,
    pub detail: Option<EntityDetail>,
}

pub(crate) fn compose_form(form: &SearchForm) -> FormView {
    FormView {
        name: form.name.clone(),
        entity_type: form.entity_type.clone(),
        states: form.states.clone(),
        entity_types: ENTITY_TYPES,
        error: form.error.clone(),
        submitting: form.submitting,
    }
}

pub(crate) fn compose_results(page: &ResultsPage) -> ResultsView {
    let accumulator = page.accumulator();
    let status = accumulator.status();

    let mut cards = Vec::with_capacity(accumulator.results().len() + 1);
    if let Some(uspto) = accumulator.uspto() {
        cards.push(CardView::Trademark(TrademarkCardView {
            risk: uspto.risk_level,
            exact_matches: uspto.exact_matches.clone(),
            similar_marks: uspto.similar_marks.clone(),
            notes: uspto.notes.clone(),
        }));
    }

    for (result_index, result) in accumulator.results().iter().enumerate() {
        let matches = result
            .raw_matches
            .iter()
            .enumerate()
            .map(|(match_index, raw)| {
                let row = MatchRef::new(result_index, match_index);
                let expansion = page.expansion(row);
                MatchRowView {
                    row,
                    name: raw.name().map(str::to_owned),
                    file_number: raw.file_number().map(str::to_owned),
                    expanded: expansion.is_some_and(|e| e.is_expanded()),
                    loading: expansion.is_some_and(|e| e.is_loading()),
                    detail: expansion.and_then(|e| e.detail()).cloned(),
                }
            })
            .collect();

        cards.push(CardView::State(StateCardView {
            state_code: result.state_code.clone(),
            state_name: result.state_name.clone(),
            availability: result.availability,
            confidence_percent: (result.confidence * 100.0).round() as u8,
            similar_names: result.similar_names.clone(),
            flags: result.flags.clone(),
            notes: result.notes.clone(),
            matches,
        }));
    }

    ResultsView {
        job_id: page.job_id().to_string(),
        search_name: page.metadata().map(|m| m.name.clone()),
        entity_type: page.metadata().map(|m| m.entity_type.clone()),
        status,
        status_label: status.label(),
        summary: project(accumulator.results()),
        cards,
    }
}

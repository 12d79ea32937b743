use std::collections::BTreeMap;

use crate::view_model::{compose_form, compose_results, AppViewModel, RouteView};
use crate::{
    Epoch, JobId, JobMetadata, MatchExpansion, MatchRef, RawMatch, ResultAccumulator, SearchRequest,
    ENTITY_TYPES,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchForm {
    pub(crate) name: String,
    pub(crate) entity_type: String,
    pub(crate) states: Vec<String>,
    pub(crate) error: Option<String>,
    pub(crate) submitting: bool,
}

impl SearchForm {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validates the form and builds the request body. The error string is
    /// shown inline on the form.
    pub(crate) fn to_request(&self) -> Result<SearchRequest, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if !ENTITY_TYPES.contains(&self.entity_type.as_str()) {
            return Err(format!(
                "Entity type must be one of: {}",
                ENTITY_TYPES.join(", ")
            ));
        }
        let states: Vec<String> = self
            .states
            .iter()
            .map(|state| state.trim().to_ascii_uppercase())
            .filter(|state| !state.is_empty())
            .collect();
        Ok(SearchRequest {
            name: name.to_string(),
            entity_type: self.entity_type.clone(),
            states: (!states.is_empty()).then_some(states),
        })
    }
}

/// Everything one results view owns: its accumulator, display metadata and
/// one expansion controller per toggled match row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsPage {
    pub(crate) epoch: Epoch,
    pub(crate) accumulator: ResultAccumulator,
    pub(crate) metadata: Option<JobMetadata>,
    pub(crate) expansions: BTreeMap<MatchRef, MatchExpansion>,
}

impl ResultsPage {
    pub(crate) fn new(job_id: JobId, epoch: Epoch) -> Self {
        Self {
            epoch,
            accumulator: ResultAccumulator::new(job_id),
            metadata: None,
            expansions: BTreeMap::new(),
        }
    }

    pub fn job_id(&self) -> &str {
        self.accumulator.job_id()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn accumulator(&self) -> &ResultAccumulator {
        &self.accumulator
    }

    pub fn metadata(&self) -> Option<&JobMetadata> {
        self.metadata.as_ref()
    }

    pub fn expansion(&self, row: MatchRef) -> Option<&MatchExpansion> {
        self.expansions.get(&row)
    }

    pub(crate) fn raw_match(&self, row: MatchRef) -> Option<(&str, &RawMatch)> {
        let result = self.accumulator.results().get(row.result_index)?;
        let raw = result.raw_matches.get(row.match_index)?;
        Some((result.state_code.as_str(), raw))
    }

    pub fn pending_details(&self) -> usize {
        self.expansions
            .values()
            .filter(|expansion| expansion.is_loading())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home(SearchForm),
    Results(ResultsPage),
}

impl Default for Route {
    fn default() -> Self {
        Route::Home(SearchForm::default())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    route: Route,
    dirty: bool,
    last_epoch: Epoch,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn results(&self) -> Option<&ResultsPage> {
        match &self.route {
            Route::Results(page) => Some(page),
            Route::Home(_) => None,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let route = match &self.route {
            Route::Home(form) => RouteView::Home(compose_form(form)),
            Route::Results(page) => RouteView::Results(compose_results(page)),
        };
        AppViewModel {
            route,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn navigate(&mut self, route: Route) {
        self.route = route;
        self.mark_dirty();
    }

    pub(crate) fn form_mut(&mut self) -> Option<&mut SearchForm> {
        match &mut self.route {
            Route::Home(form) => Some(form),
            Route::Results(_) => None,
        }
    }

    pub(crate) fn next_epoch(&mut self) -> Epoch {
        self.last_epoch += 1;
        self.last_epoch
    }

    /// The results page for `job_id` if it is the one currently shown and was
    /// opened at `epoch`. Anything else is stale.
    pub(crate) fn page_mut(&mut self, job_id: &str, epoch: Epoch) -> Option<&mut ResultsPage> {
        match &mut self.route {
            Route::Results(page) if page.epoch == epoch && page.job_id() == job_id => Some(page),
            _ => None,
        }
    }

    pub(crate) fn current_page_mut(&mut self) -> Option<&mut ResultsPage> {
        match &mut self.route {
            Route::Results(page) => Some(page),
            Route::Home(_) => None,
        }
    }
}

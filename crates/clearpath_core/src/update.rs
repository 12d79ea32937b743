use clearpath_logging::{cp_debug, cp_warn};

use crate::accumulator::Ingest;
use crate::state::{ResultsPage, Route, SearchForm};
use crate::{AppState, Effect, JobId, MatchExpansion, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormEdited {
            name,
            entity_type,
            states,
        } => {
            if let Some(form) = state.form_mut() {
                if form.submitting {
                    return (state, Vec::new());
                }
                form.name = name;
                form.entity_type = entity_type;
                form.states = states;
                form.error = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SearchSubmitted => {
            let Some(form) = state.form_mut() else {
                return (state, Vec::new());
            };
            if form.submitting {
                return (state, Vec::new());
            }
            let effects = match form.to_request() {
                Ok(request) => {
                    form.submitting = true;
                    form.error = None;
                    vec![Effect::SubmitSearch(request)]
                }
                Err(message) => {
                    form.error = Some(message);
                    Vec::new()
                }
            };
            state.mark_dirty();
            effects
        }
        Msg::SearchAccepted {
            job_id,
            states_queued,
        } => {
            let submitting = state.form_mut().is_some_and(|form| form.submitting);
            if !submitting {
                return (state, Vec::new());
            }
            if job_id.trim().is_empty() {
                reject_submission(&mut state, "Server returned an empty job id".to_string());
                return (state, Vec::new());
            }
            cp_debug!("Job {} queued for {:?}", job_id, states_queued);
            open_results(&mut state, job_id)
        }
        Msg::SearchRejected { message } => {
            reject_submission(&mut state, message);
            Vec::new()
        }
        Msg::ResultsOpened { job_id } => {
            if job_id.trim().is_empty() {
                cp_warn!("Ignoring results route without a job id");
                return (state, Vec::new());
            }
            if state.results().is_some_and(|page| page.job_id() == job_id) {
                return (state, Vec::new());
            }
            open_results(&mut state, job_id)
        }
        Msg::ResultsClosed => {
            let effects = close_results(&mut state);
            if state.results().is_some() {
                state.navigate(Route::Home(SearchForm::default()));
            }
            effects
        }
        Msg::StreamEvent {
            job_id,
            epoch,
            event,
            data,
        } => {
            let Some(page) = state.page_mut(&job_id, epoch) else {
                cp_debug!("Discarding stale {} event for job {}", event, job_id);
                return (state, Vec::new());
            };
            let outcome = page.accumulator.ingest(&event, &data);
            let effects = match outcome {
                Ingest::Finished(_) => vec![Effect::CloseStream { job_id }],
                _ => Vec::new(),
            };
            if outcome.changed_state() {
                state.mark_dirty();
            }
            effects
        }
        Msg::StreamFailed {
            job_id,
            epoch,
            reason,
        } => {
            let Some(page) = state.page_mut(&job_id, epoch) else {
                return (state, Vec::new());
            };
            match page.accumulator.on_transport_error(&reason) {
                Ingest::Finished(_) => {
                    state.mark_dirty();
                    vec![Effect::CloseStream { job_id }]
                }
                _ => Vec::new(),
            }
        }
        Msg::JobMetadataLoaded {
            job_id,
            epoch,
            metadata,
        } => {
            if let Some(page) = state.page_mut(&job_id, epoch) {
                page.metadata = Some(metadata);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::JobMetadataFailed { job_id, message, .. } => {
            // Display-only; the header keeps its placeholder.
            cp_warn!("Job {}: metadata unavailable: {}", job_id, message);
            Vec::new()
        }
        Msg::MatchToggled { row } => {
            let Some(page) = state.current_page_mut() else {
                return (state, Vec::new());
            };
            let Some((state_code, raw)) = page.raw_match(row) else {
                cp_debug!("Ignoring toggle for unknown match row {:?}", row);
                return (state, Vec::new());
            };
            let fresh = MatchExpansion::for_match(state_code, raw);
            let job_id = page.job_id().to_string();
            let epoch = page.epoch;
            let request = page.expansions.entry(row).or_insert(fresh).toggle();
            state.mark_dirty();
            request
                .map(|key| {
                    vec![Effect::FetchDetail {
                        job_id,
                        epoch,
                        row,
                        key,
                    }]
                })
                .unwrap_or_default()
        }
        Msg::DetailLoaded {
            job_id,
            epoch,
            row,
            detail,
        } => {
            let Some(page) = state.page_mut(&job_id, epoch) else {
                cp_debug!("Discarding detail for torn-down job {}", job_id);
                return (state, Vec::new());
            };
            if let Some(expansion) = page
                .expansions
                .get_mut(&row)
                .filter(|expansion| expansion.is_loading())
            {
                expansion.resolve(detail);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn open_results(state: &mut AppState, job_id: JobId) -> Vec<Effect> {
    let mut effects = close_results(state);
    let epoch = state.next_epoch();
    let mut page = ResultsPage::new(job_id.clone(), epoch);
    if page.accumulator.subscribe() {
        effects.push(Effect::OpenStream {
            job_id: job_id.clone(),
            epoch,
        });
        effects.push(Effect::FetchJobMetadata { job_id, epoch });
    }
    state.navigate(Route::Results(page));
    effects
}

fn close_results(state: &mut AppState) -> Vec<Effect> {
    let Some(page) = state.current_page_mut() else {
        return Vec::new();
    };
    if page.accumulator.unsubscribe() {
        vec![Effect::CloseStream {
            job_id: page.job_id().to_string(),
        }]
    } else {
        Vec::new()
    }
}

fn reject_submission(state: &mut AppState, message: String) {
    if let Some(form) = state.form_mut() {
        if !form.submitting {
            return;
        }
        cp_warn!("Search submission failed: {}", message);
        form.submitting = false;
        form.error = Some(message);
        state.mark_dirty();
    }
}

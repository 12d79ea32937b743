use clearpath_core::{update, AppState, Effect, Msg, RouteView, SearchRequest};

fn init_logging() {
    clearpath_logging::initialize_for_tests();
}

fn fill_form(state: AppState, name: &str, entity_type: &str, states: &[&str]) -> AppState {
    let (state, effects) = update(
        state,
        Msg::FormEdited {
            name: name.to_string(),
            entity_type: entity_type.to_string(),
            states: states.iter().map(|s| s.to_string()).collect(),
        },
    );
    assert!(effects.is_empty());
    state
}

fn form_error(state: &AppState) -> Option<String> {
    match state.view().route {
        RouteView::Home(form) => form.error,
        RouteView::Results(_) => panic!("expected home route"),
    }
}

#[test]
fn valid_form_submits_trimmed_request() {
    init_logging();
    let state = fill_form(AppState::new(), "  Acme Widgets ", "LLC", &["de", " ca "]);
    let (state, effects) = update(state, Msg::SearchSubmitted);
    assert_eq!(
        effects,
        vec![Effect::SubmitSearch(SearchRequest {
            name: "Acme Widgets".to_string(),
            entity_type: "LLC".to_string(),
            states: Some(vec!["DE".to_string(), "CA".to_string()]),
        })]
    );

    // A second submit while the first is pending is refused.
    let (_state, effects) = update(state, Msg::SearchSubmitted);
    assert!(effects.is_empty());
}

#[test]
fn empty_states_are_left_to_the_server() {
    init_logging();
    let state = fill_form(AppState::new(), "Acme", "Corporation", &[]);
    let (_state, effects) = update(state, Msg::SearchSubmitted);
    assert!(matches!(
        &effects[..],
        [Effect::SubmitSearch(SearchRequest { states: None, .. })]
    ));
}

#[test]
fn invalid_form_is_rejected_inline_without_effects() {
    init_logging();
    let state = fill_form(AppState::new(), "   ", "LLC", &[]);
    let (state, effects) = update(state, Msg::SearchSubmitted);
    assert!(effects.is_empty());
    assert_eq!(form_error(&state).as_deref(), Some("Name cannot be empty"));

    let state = fill_form(state, "Acme", "Sole Proprietorship", &[]);
    assert_eq!(form_error(&state), None);
    let (state, effects) = update(state, Msg::SearchSubmitted);
    assert!(effects.is_empty());
    assert!(form_error(&state).unwrap().starts_with("Entity type must be one of"));
}

#[test]
fn rejected_submission_keeps_form_editable() {
    init_logging();
    let state = fill_form(AppState::new(), "Acme", "LLC", &[]);
    let (state, _) = update(state, Msg::SearchSubmitted);
    let (state, effects) = update(
        state,
        Msg::SearchRejected {
            message: "No supported states requested. Supported: ['DE']".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        form_error(&state).as_deref(),
        Some("No supported states requested. Supported: ['DE']")
    );

    let state = fill_form(state, "Acme Two", "LLC", &["DE"]);
    let (_state, effects) = update(state, Msg::SearchSubmitted);
    assert_eq!(effects.len(), 1);
}

#[test]
fn accepted_submission_routes_to_results_and_subscribes() {
    init_logging();
    let state = fill_form(AppState::new(), "Acme", "LLC", &["DE"]);
    let (state, _) = update(state, Msg::SearchSubmitted);
    let (state, effects) = update(
        state,
        Msg::SearchAccepted {
            job_id: "abc123".to_string(),
            states_queued: vec!["DE".to_string()],
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::OpenStream {
                job_id: "abc123".to_string(),
                epoch: 1,
            },
            Effect::FetchJobMetadata {
                job_id: "abc123".to_string(),
                epoch: 1,
            },
        ]
    );
    let RouteView::Results(view) = state.view().route else {
        panic!("expected results route");
    };
    assert_eq!(view.job_id, "abc123");
    assert_eq!(view.search_name, None);
    assert!(view.cards.is_empty());
}

#[test]
fn unsolicited_acceptance_is_ignored() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::SearchAccepted {
            job_id: "abc123".to_string(),
            states_queued: Vec::new(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.results().is_none());
}

#[test]
fn empty_job_id_is_a_submission_failure() {
    init_logging();
    let state = fill_form(AppState::new(), "Acme", "LLC", &[]);
    let (state, _) = update(state, Msg::SearchSubmitted);
    let (state, effects) = update(
        state,
        Msg::SearchAccepted {
            job_id: " ".to_string(),
            states_queued: Vec::new(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.results().is_none());
    assert!(form_error(&state).is_some());
}

#[test]
fn noop_and_tick_change_nothing() {
    init_logging();
    let mut state = AppState::new();
    assert!(!state.consume_dirty());
    let (state, effects) = update(state, Msg::Tick);
    assert!(effects.is_empty());
    let (mut state, effects) = update(state, Msg::NoOp);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

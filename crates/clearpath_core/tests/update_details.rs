use clearpath_core::{
    update, AppState, CardView, DetailKey, Effect, EntityDetail, MatchRef, Msg, RouteView,
};

fn init_logging() {
    clearpath_logging::initialize_for_tests();
}

const CALIFORNIA: &str = r#"{"state_code":"CA","state_name":"California","availability":"taken","confidence":0.99,"raw_matches":[{"name":"ACME LLC","file_number":"9999"},{"name":"ACME HOLDINGS"}]}"#;

fn results_with_matches() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::ResultsOpened {
            job_id: "abc123".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::StreamEvent {
            job_id: "abc123".to_string(),
            epoch: 1,
            event: "state_result".to_string(),
            data: CALIFORNIA.to_string(),
        },
    );
    state
}

fn toggle(state: AppState, row: MatchRef) -> (AppState, Vec<Effect>) {
    update(state, Msg::MatchToggled { row })
}

fn detail(name: &str) -> EntityDetail {
    EntityDetail {
        file_number: "9999".to_string(),
        entity_name: Some(name.to_string()),
        entity_kind: Some("Limited Liability Company".to_string()),
        formation_date: Some("2019-04-02".to_string()),
        registered_agent: None,
        reference_url: Some("https://opencorporates.com/companies/us_ca/9999".to_string()),
        error: None,
        cached: false,
    }
}

#[test]
fn first_expand_fetches_and_reexpand_does_not() {
    init_logging();
    let row = MatchRef::new(0, 0);
    let state = results_with_matches();

    let (state, effects) = toggle(state, row);
    assert_eq!(
        effects,
        vec![Effect::FetchDetail {
            job_id: "abc123".to_string(),
            epoch: 1,
            row,
            key: DetailKey::new("CA", "9999"),
        }]
    );
    assert!(state.results().unwrap().expansion(row).unwrap().is_loading());

    let (state, effects) = toggle(state, row);
    assert!(effects.is_empty());
    let (state, effects) = toggle(state, row);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::DetailLoaded {
            job_id: "abc123".to_string(),
            epoch: 1,
            row,
            detail: detail("ACME LLC"),
        },
    );
    let (state, _) = toggle(state, row);
    let (state, effects) = toggle(state, row);
    assert!(effects.is_empty());

    let RouteView::Results(view) = state.view().route else {
        panic!("expected results view");
    };
    let CardView::State(card) = &view.cards[0] else {
        panic!("expected state card");
    };
    let match_row = &card.matches[0];
    assert!(match_row.expanded);
    assert!(!match_row.loading);
    assert_eq!(
        match_row.detail.as_ref().and_then(|d| d.entity_name.as_deref()),
        Some("ACME LLC")
    );
}

#[test]
fn match_without_file_number_never_fetches() {
    init_logging();
    let row = MatchRef::new(0, 1);
    let (state, effects) = toggle(results_with_matches(), row);
    assert!(effects.is_empty());
    let expansion = state.results().unwrap().expansion(row).unwrap();
    assert!(expansion.is_expanded());
    assert!(expansion.key().is_none());
}

#[test]
fn unknown_rows_are_ignored() {
    init_logging();
    let (mut state, _) = toggle(results_with_matches(), MatchRef::new(0, 0));
    assert!(state.consume_dirty());
    let (mut state, effects) = toggle(state, MatchRef::new(4, 0));
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn failed_detail_is_rendered_inline_for_that_row_only() {
    init_logging();
    let state = results_with_matches();
    let (state, _) = toggle(state, MatchRef::new(0, 0));
    let (state, _) = toggle(state, MatchRef::new(0, 1));
    let key = DetailKey::new("CA", "9999");
    let (state, _) = update(
        state,
        Msg::DetailLoaded {
            job_id: "abc123".to_string(),
            epoch: 1,
            row: MatchRef::new(0, 0),
            detail: EntityDetail::unavailable(&key, "http status 502"),
        },
    );

    let RouteView::Results(view) = state.view().route else {
        panic!("expected results view");
    };
    let CardView::State(card) = &view.cards[0] else {
        panic!("expected state card");
    };
    let failed = card.matches[0].detail.as_ref().unwrap();
    assert_eq!(failed.error.as_deref(), Some("http status 502"));
    assert_eq!(failed.reference_url, Some(key.fallback_url()));
    assert!(card.matches[1].expanded);
    assert!(card.matches[1].detail.is_none());
}

#[test]
fn detail_for_torn_down_view_is_discarded() {
    init_logging();
    let (state, _) = toggle(results_with_matches(), MatchRef::new(0, 0));
    let (state, _) = update(state, Msg::ResultsClosed);
    let (mut state, effects) = update(
        state,
        Msg::DetailLoaded {
            job_id: "abc123".to_string(),
            epoch: 1,
            row: MatchRef::new(0, 0),
            detail: detail("ACME LLC"),
        },
    );
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert!(state.results().is_none());

    let (mut state, _) = update(
        state,
        Msg::DetailLoaded {
            job_id: "abc123".to_string(),
            epoch: 1,
            row: MatchRef::new(0, 0),
            detail: detail("ACME LLC"),
        },
    );
    assert!(!state.consume_dirty());
}

#[test]
fn rows_stay_toggleable_after_stream_completes() {
    init_logging();
    let (state, _) = update(
        results_with_matches(),
        Msg::StreamEvent {
            job_id: "abc123".to_string(),
            epoch: 1,
            event: "done".to_string(),
            data: r#"{"status":"complete"}"#.to_string(),
        },
    );
    let (state, effects) = toggle(state, MatchRef::new(0, 0));
    assert_eq!(effects.len(), 1);
    assert_eq!(state.results().unwrap().pending_details(), 1);
}

#[test]
fn detail_from_before_a_reopen_is_discarded() {
    init_logging();
    let row = MatchRef::new(0, 0);
    let (state, _) = toggle(results_with_matches(), row);
    let (state, _) = update(state, Msg::ResultsClosed);
    let (state, _) = update(
        state,
        Msg::ResultsOpened {
            job_id: "abc123".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::StreamEvent {
            job_id: "abc123".to_string(),
            epoch: 2,
            event: "state_result".to_string(),
            data: CALIFORNIA.to_string(),
        },
    );
    let (state, effects) = toggle(state, row);
    assert!(matches!(&effects[..], [Effect::FetchDetail { epoch: 2, .. }]));

    let (state, _) = update(
        state,
        Msg::DetailLoaded {
            job_id: "abc123".to_string(),
            epoch: 1,
            row,
            detail: detail("STALE LLC"),
        },
    );
    let expansion = state.results().unwrap().expansion(row).unwrap();
    assert!(expansion.is_loading());
    assert!(expansion.detail().is_none());
}

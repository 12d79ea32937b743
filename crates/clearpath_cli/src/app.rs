use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::time::Duration;

use clearpath_core::{update, AppState, AppViewModel, JobStreamStatus, MatchRef, Msg, Route};
use clearpath_logging::{cp_debug, cp_info, cp_warn};

use crate::cli::Command;
use crate::effects::EffectRunner;
use crate::render::render;

const POLL_INTERVAL: Duration = Duration::from_millis(75);
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct App {
    state: AppState,
    runner: EffectRunner,
    auto_details: bool,
    interactive: bool,
}

impl App {
    pub fn new(runner: EffectRunner, auto_details: bool) -> Self {
        Self {
            state: AppState::new(),
            runner,
            auto_details,
            interactive: io::stdout().is_terminal(),
        }
    }

    pub fn run(mut self, command: Command) -> io::Result<ExitCode> {
        for msg in initial_msgs(command) {
            self.dispatch_msg(msg)?;
        }

        let succeeded = loop {
            if let Some(succeeded) = outcome(&self.state) {
                break succeeded;
            }
            let msg = self.runner.next_msg(POLL_INTERVAL).unwrap_or(Msg::Tick);
            self.dispatch_msg(msg)?;
        };

        let view = self.state.view();
        if !self.interactive {
            print_lines(&render(&view))?;
        }
        self.close();

        if succeeded {
            cp_info!("Finished");
            Ok(ExitCode::SUCCESS)
        } else {
            cp_warn!("Finished with errors");
            Ok(ExitCode::FAILURE)
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) -> io::Result<()> {
        if !matches!(msg, Msg::Tick) {
            cp_debug!("Dispatching {:?}", msg);
        }
        self.apply(msg);
        if self.auto_details {
            for row in rows_to_expand(&self.state) {
                self.apply(Msg::MatchToggled { row });
            }
        }

        if self.state.consume_dirty() && self.interactive {
            let view = self.state.view();
            self.redraw(&view)?;
        }
        Ok(())
    }

    fn apply(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Tears down the results view so the engine cancels its stream.
    fn close(&mut self) {
        self.apply(Msg::ResultsClosed);
    }

    fn redraw(&self, view: &AppViewModel) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{CLEAR_SCREEN}")?;
        for line in render(view) {
            writeln!(stdout, "{line}")?;
        }
        stdout.flush()
    }
}

fn initial_msgs(command: Command) -> Vec<Msg> {
    match command {
        Command::Search {
            name,
            entity_type,
            states,
            ..
        } => vec![
            Msg::FormEdited {
                name,
                entity_type,
                states,
            },
            Msg::SearchSubmitted,
        ],
        Command::Watch { job_id, .. } => vec![Msg::ResultsOpened { job_id }],
    }
}

/// `Some(success)` once there is nothing left to wait for.
fn outcome(state: &AppState) -> Option<bool> {
    match state.route() {
        Route::Home(form) => (form.error().is_some() && !form.is_submitting()).then_some(false),
        Route::Results(page) => {
            let status = page.accumulator().status();
            (status.is_terminal() && page.pending_details() == 0)
                .then_some(status == JobStreamStatus::Complete)
        }
    }
}

/// Collapsed rows that carry a file number.
fn rows_to_expand(state: &AppState) -> Vec<MatchRef> {
    let Some(page) = state.results() else {
        return Vec::new();
    };
    let mut rows = Vec::new();
    for (result_index, result) in page.accumulator().results().iter().enumerate() {
        for (match_index, raw) in result.raw_matches.iter().enumerate() {
            let row = MatchRef::new(result_index, match_index);
            let expanded = page.expansion(row).is_some_and(|e| e.is_expanded());
            if !expanded && raw.file_number().is_some() {
                rows.push(row);
            }
        }
    }
    rows
}

fn print_lines(lines: &[String]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use clearpath_core::{update, AppState, MatchRef, Msg};

    use super::{outcome, rows_to_expand};

    fn stream(state: AppState, event: &str, data: &str) -> AppState {
        update(
            state,
            Msg::StreamEvent {
                job_id: "abc123".to_string(),
                epoch: 1,
                event: event.to_string(),
                data: data.to_string(),
            },
        )
        .0
    }

    fn opened() -> AppState {
        update(
            AppState::new(),
            Msg::ResultsOpened {
                job_id: "abc123".to_string(),
            },
        )
        .0
    }

    #[test]
    fn rejected_submission_ends_with_failure() {
        let (state, _) = update(
            AppState::new(),
            Msg::FormEdited {
                name: "Acme".to_string(),
                entity_type: "LLC".to_string(),
                states: Vec::new(),
            },
        );
        let (state, _) = update(state, Msg::SearchSubmitted);
        assert_eq!(outcome(&state), None);
        let (state, _) = update(
            state,
            Msg::SearchRejected {
                message: "backend down".to_string(),
            },
        );
        assert_eq!(outcome(&state), Some(false));
    }

    #[test]
    fn running_stream_keeps_waiting() {
        let state = stream(
            opened(),
            "state_result",
            r#"{"state_code":"DE","availability":"available","confidence":0.9}"#,
        );
        assert_eq!(outcome(&state), None);
        let state = stream(state, "done", r#"{"status":"complete"}"#);
        assert_eq!(outcome(&state), Some(true));
    }

    #[test]
    fn stream_error_ends_with_failure() {
        let state = stream(opened(), "done", r#"{"status":"error"}"#);
        assert_eq!(outcome(&state), Some(false));
    }

    #[test]
    fn pending_details_delay_exit() {
        let state = stream(
            opened(),
            "state_result",
            r#"{"state_code":"DE","availability":"taken","confidence":1.0,"raw_matches":[{"name":"ACME LLC","file_number":"1234"},{"name":"ACME INC"}]}"#,
        );
        let rows = rows_to_expand(&state);
        assert_eq!(rows, vec![MatchRef::new(0, 0)]);

        let (state, _) = update(state, Msg::MatchToggled { row: rows[0] });
        assert!(rows_to_expand(&state).is_empty());
        let state = stream(state, "done", r#"{"status":"complete"}"#);
        assert_eq!(outcome(&state), None);
    }
}

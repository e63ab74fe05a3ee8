use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use docval_core::{update, AppState, AppViewModel, Msg, SubmissionState, ValidationReport};
use docval_engine::{load_upload, EngineError};
use docval_logging::{docval_debug, docval_info, docval_warn};

use super::effects::{to_selection, EffectRunner};
use super::ui::render::{render, render_rejected, write_lines, SubmissionSummary};
use crate::config::{ClientConfig, OutputMode};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the state machine for one client and drives it to settlement.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    interrupts: Option<mpsc::Receiver<()>>,
    interrupted: bool,
}

impl Session {
    pub fn new(runner: EffectRunner, interrupts: Option<mpsc::Receiver<()>>) -> Self {
        Self {
            state: AppState::new(),
            runner,
            interrupts,
            interrupted: false,
        }
    }

    /// Applies one message and runs its effects. Returns the new view when it changed.
    pub fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;
        self.runner.enqueue(effects);
        was_dirty.then_some(view)
    }

    /// Blocks until the in-flight submission settles, is cancelled, or the engine stops.
    pub fn run_until_settled(&mut self) -> AppViewModel {
        while self.state.submission() == SubmissionState::Submitting {
            if self.interrupted() {
                docval_info!("interrupted; cancelling in-flight submission");
                self.dispatch(Msg::CancelRequested);
                break;
            }

            match self.runner.next_msg(POLL_INTERVAL) {
                Ok(Some(msg)) => {
                    if self.dispatch(msg).is_none() {
                        docval_debug!("discarded stale settlement");
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    docval_warn!("engine unavailable: {}", err);
                    if let Some(submission_id) = self.state.in_flight() {
                        self.dispatch(Msg::TransportFailed {
                            submission_id,
                            message: err.to_string(),
                        });
                    }
                    break;
                }
            }
        }
        self.state.view()
    }

    /// Whether an interrupt has arrived. Once seen it stays set for the session.
    pub fn interrupted(&mut self) -> bool {
        if !self.interrupted {
            self.interrupted = self
                .interrupts
                .as_ref()
                .is_some_and(|rx| rx.try_recv().is_ok());
        }
        self.interrupted
    }

    /// Succeeded with a report in a shape the service is known to send.
    fn settled_with_report(&self) -> bool {
        self.state.submission() == SubmissionState::Succeeded
            && !matches!(
                self.state.report(),
                Some(ValidationReport::Unrecognized { .. }) | None
            )
    }
}

/// Validate each file in turn; the next one is only submitted after the
/// previous one settled.
pub fn run_validate(
    config: &ClientConfig,
    files: &[PathBuf],
    interrupts: Option<mpsc::Receiver<()>>,
) -> Result<ExitCode, EngineError> {
    let runner = EffectRunner::new(config.service.clone())?;
    let mut session = Session::new(runner, interrupts);
    let mut all_succeeded = true;

    let stdout = io::stdout();
    let stderr = io::stderr();

    for path in files {
        if session.interrupted() {
            docval_warn!("interrupted; skipping remaining files");
            all_succeeded = false;
            break;
        }

        let label = display_name(path);
        let view = match load_upload(path) {
            Ok(file) => {
                session.dispatch(Msg::FileSelected(to_selection(file)));
                session.dispatch(Msg::SubmitClicked);
                session.run_until_settled()
            }
            Err(err) => {
                docval_warn!("{}", err);
                all_succeeded = false;
                let reason = err.to_string();
                emit(
                    config.output,
                    &mut stdout.lock(),
                    &mut stderr.lock(),
                    || serde_json::to_string(&SubmissionSummary::rejected(&label, &reason)),
                    || render_rejected(&label, &reason),
                );
                continue;
            }
        };

        all_succeeded &= session.settled_with_report();
        emit(
            config.output,
            &mut stdout.lock(),
            &mut stderr.lock(),
            || serde_json::to_string(&SubmissionSummary::from_view(&label, &view)),
            || render(&label, &view),
        );
    }

    Ok(if all_succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn emit(
    output: OutputMode,
    out: &mut impl Write,
    err: &mut impl Write,
    json: impl FnOnce() -> serde_json::Result<String>,
    lines: impl FnOnce() -> Vec<super::ui::render::Line>,
) {
    let result = match output {
        OutputMode::Json => match json() {
            Ok(text) => writeln!(out, "{text}"),
            Err(e) => writeln!(err, "Error: {e}"),
        },
        OutputMode::Human => write_lines(out, err, &lines()),
    };
    if let Err(e) = result {
        docval_warn!("failed to write output: {}", e);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

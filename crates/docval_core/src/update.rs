use crate::response::{interpret_response, ResponseOutcome};
use crate::{AppState, Effect, Msg, SubmissionState};

pub const CANCELLED_REASON: &str = "submission cancelled";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(selection) => {
            state.select(selection);
            Vec::new()
        }
        Msg::SubmitClicked => match state.begin_submission() {
            Some((submission_id, upload)) => vec![Effect::Submit {
                submission_id,
                upload,
            }],
            None => Vec::new(),
        },
        Msg::ResponseReceived {
            submission_id,
            status,
            body,
        } => {
            if state.settle(submission_id) {
                match interpret_response(status, &body) {
                    ResponseOutcome::Report(report) => state.succeed(report),
                    ResponseOutcome::Failure(reason) => state.fail(reason),
                }
            }
            Vec::new()
        }
        Msg::TransportFailed {
            submission_id,
            message,
        } => {
            if state.settle(submission_id) {
                state.fail(format!("Network error: {message}"));
            }
            Vec::new()
        }
        Msg::CancelRequested => {
            if state.submission() != SubmissionState::Submitting {
                return (state, Vec::new());
            }
            match state.in_flight() {
                Some(submission_id) => {
                    state.settle(submission_id);
                    state.fail(CANCELLED_REASON.to_string());
                    vec![Effect::CancelSubmission { submission_id }]
                }
                None => Vec::new(),
            }
        }
    };

    (state, effects)
}

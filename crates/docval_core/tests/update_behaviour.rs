use std::sync::Once;

use docval_core::{
    update, AppState, Effect, Msg, SubmissionState, UploadSelection, CANCELLED_REASON,
    SUBMITTING_LABEL, SUBMIT_LABEL,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(docval_logging::initialize_for_tests);
}

fn docx(name: &str) -> UploadSelection {
    UploadSelection::new(
        name,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        b"PK\x03\x04fake".to_vec(),
    )
}

fn select_and_submit(state: AppState, name: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::FileSelected(docx(name)));
    update(state, Msg::SubmitClicked)
}

#[test]
fn submit_without_file_is_noop() {
    init_logging();
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::SubmitClicked);

    assert_eq!(next.submission(), SubmissionState::Idle);
    assert!(effects.is_empty());
    assert!(!next.view().submit_enabled);
    assert!(!next.consume_dirty());
}

#[test]
fn selecting_a_file_enables_submit_without_requesting() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::FileSelected(docx("soa.docx")));
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.submission, SubmissionState::Idle);
    assert_eq!(view.selected_file.as_deref(), Some("soa.docx"));
    assert!(view.submit_enabled);
    assert_eq!(view.submit_label, SUBMIT_LABEL);
    assert!(state.consume_dirty());
}

#[test]
fn submit_emits_exactly_one_request() {
    init_logging();
    let (state, effects) = select_and_submit(AppState::new(), "soa.docx");

    assert_eq!(state.submission(), SubmissionState::Submitting);
    assert_eq!(
        effects,
        vec![Effect::Submit {
            submission_id: 1,
            upload: docx("soa.docx"),
        }]
    );
}

#[test]
fn hanging_request_keeps_submit_disabled() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), "soa.docx");

    // Nothing settles; repeated clicks must not issue more requests.
    let (state, effects) = update(state, Msg::SubmitClicked);
    let (state, more) = update(state, Msg::SubmitClicked);
    let view = state.view();

    assert!(effects.is_empty());
    assert!(more.is_empty());
    assert_eq!(view.submission, SubmissionState::Submitting);
    assert!(!view.submit_enabled);
    assert_eq!(view.submit_label, SUBMITTING_LABEL);
    assert_eq!(state.in_flight(), Some(1));
}

#[test]
fn new_submission_clears_previous_failure() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), "soa.docx");
    let (state, _) = update(
        state,
        Msg::ResponseReceived {
            submission_id: 1,
            status: 500,
            body: "oops".into(),
        },
    );
    assert_eq!(state.failure(), Some("server error 500"));

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(effects.len(), 1);
    assert_eq!(state.submission(), SubmissionState::Submitting);
    assert_eq!(state.failure(), None);
    assert_eq!(state.report(), None);
    assert_eq!(state.view().error, None);
}

#[test]
fn new_submission_clears_previous_report() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), "soa.docx");
    let (state, _) = update(
        state,
        Msg::ResponseReceived {
            submission_id: 1,
            status: 200,
            body: r#"{"CLIENT_INFORMATION":[{"issue":"a","details":"b"}]}"#.into(),
        },
    );
    assert!(state.report().is_some());

    let (state, _) = update(state, Msg::SubmitClicked);
    assert_eq!(state.report(), None);
    assert_eq!(state.view().report, None);
}

#[test]
fn selecting_after_result_returns_to_idle() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), "soa.docx");
    let (state, _) = update(
        state,
        Msg::TransportFailed {
            submission_id: 1,
            message: "connection refused".into(),
        },
    );
    assert_eq!(state.submission(), SubmissionState::Failed);

    let (state, effects) = update(state, Msg::FileSelected(docx("other.doc")));
    assert!(effects.is_empty());
    assert_eq!(state.submission(), SubmissionState::Idle);
    assert_eq!(state.failure(), None);
    assert_eq!(state.view().selected_file.as_deref(), Some("other.doc"));
}

#[test]
fn selecting_while_submitting_keeps_request_in_flight() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), "soa.docx");
    let (state, effects) = update(state, Msg::FileSelected(docx("other.doc")));

    assert!(effects.is_empty());
    assert_eq!(state.submission(), SubmissionState::Submitting);
    assert_eq!(state.in_flight(), Some(1));
    assert!(!state.view().submit_enabled);
}

#[test]
fn stale_settlement_is_ignored() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), "soa.docx");
    let (state, _) = update(state, Msg::CancelRequested);
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(
        effects,
        vec![Effect::Submit {
            submission_id: 2,
            upload: docx("soa.docx"),
        }]
    );

    // The first request comes back late.
    let (state, _) = update(
        state,
        Msg::ResponseReceived {
            submission_id: 1,
            status: 200,
            body: "[]".into(),
        },
    );
    assert_eq!(state.submission(), SubmissionState::Submitting);
    assert_eq!(state.in_flight(), Some(2));
    assert_eq!(state.report(), None);
}

#[test]
fn cancel_fails_submission_and_emits_effect() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), "soa.docx");
    let (state, effects) = update(state, Msg::CancelRequested);

    assert_eq!(effects, vec![Effect::CancelSubmission { submission_id: 1 }]);
    assert_eq!(state.submission(), SubmissionState::Failed);
    assert_eq!(state.failure(), Some(CANCELLED_REASON));
    assert_eq!(state.in_flight(), None);
    assert!(state.view().submit_enabled);
}

#[test]
fn cancel_outside_submission_is_noop() {
    init_logging();
    let (mut state, _) = update(AppState::new(), Msg::FileSelected(docx("soa.docx")));
    assert!(state.consume_dirty());
    let before = state.clone();

    let (mut next, effects) = update(state, Msg::CancelRequested);

    assert!(effects.is_empty());
    assert_eq!(next, before);
    assert!(!next.consume_dirty());
}

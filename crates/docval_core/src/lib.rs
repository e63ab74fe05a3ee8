//! Docval core: pure submission state machine, report model and view-model helpers.
mod effect;
mod msg;
mod report;
mod response;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use report::{
    category_title, CategoryIssues, Issue, ItemPoints, ValidationReport, KNOWN_CATEGORIES,
};
pub use response::{failure_message, interpret_response, ResponseOutcome, UNPARSABLE_BODY};
pub use state::{
    AppState, SubmissionId, SubmissionState, UploadSelection, SUBMITTING_LABEL, SUBMIT_LABEL,
};
pub use update::{update, CANCELLED_REASON};
pub use view_model::{
    AppViewModel, EntryView, ReportView, SectionView, NO_ISSUES_PLACEHOLDER, UNRECOGNIZED_NOTICE,
};

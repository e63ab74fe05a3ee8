use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use crate::view_model::{AppViewModel, ReportView};
use crate::ValidationReport;

pub type SubmissionId = u64;

pub const SUBMIT_LABEL: &str = "Validate";
pub const SUBMITTING_LABEL: &str = "Checking…";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// The document currently chosen for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadSelection {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl UploadSelection {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

// Keep document bytes out of debug logs.
impl fmt::Debug for UploadSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadSelection")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selection: Option<UploadSelection>,
    submission: SubmissionState,
    in_flight: Option<SubmissionId>,
    last_submission_id: SubmissionId,
    report: Option<ValidationReport>,
    failure: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let submitting = self.submission == SubmissionState::Submitting;
        AppViewModel {
            submission: self.submission,
            selected_file: self.selection.as_ref().map(|s| s.file_name.clone()),
            submit_enabled: self.selection.is_some() && !submitting,
            submit_label: if submitting {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
            report: match (self.submission, &self.report) {
                (SubmissionState::Succeeded, Some(report)) => {
                    Some(ReportView::from_report(report))
                }
                _ => None,
            },
            error: match self.submission {
                SubmissionState::Failed => self.failure.clone(),
                _ => None,
            },
            dirty: self.dirty,
        }
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn select(&mut self, selection: UploadSelection) {
        self.selection = Some(selection);
        if self.submission != SubmissionState::Submitting {
            self.submission = SubmissionState::Idle;
            self.report = None;
            self.failure = None;
        }
        self.mark_dirty();
    }

    /// Moves to `Submitting` and returns the upload to send, or `None` when
    /// submission is not currently allowed.
    pub(crate) fn begin_submission(&mut self) -> Option<(SubmissionId, UploadSelection)> {
        if self.submission == SubmissionState::Submitting {
            return None;
        }
        let upload = self.selection.clone()?;

        self.report = None;
        self.failure = None;
        self.last_submission_id += 1;
        let submission_id = self.last_submission_id;
        self.in_flight = Some(submission_id);
        self.submission = SubmissionState::Submitting;
        self.mark_dirty();
        Some((submission_id, upload))
    }

    /// Takes the in-flight id if it matches `submission_id`; stale settlements get `false`.
    pub(crate) fn settle(&mut self, submission_id: SubmissionId) -> bool {
        if self.in_flight != Some(submission_id) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub(crate) fn succeed(&mut self, report: ValidationReport) {
        self.report = Some(report);
        self.failure = None;
        self.submission = SubmissionState::Succeeded;
        self.mark_dirty();
    }

    pub(crate) fn fail(&mut self, reason: String) {
        self.report = None;
        self.failure = Some(reason);
        self.submission = SubmissionState::Failed;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

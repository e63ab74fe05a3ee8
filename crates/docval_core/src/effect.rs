#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Submit {
        submission_id: crate::SubmissionId,
        upload: crate::UploadSelection,
    },
    CancelSubmission {
        submission_id: crate::SubmissionId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a document to upload.
    FileSelected(crate::UploadSelection),
    /// User pressed Validate.
    SubmitClicked,
    /// The in-flight request settled with an HTTP response.
    ResponseReceived {
        submission_id: crate::SubmissionId,
        status: u16,
        body: String,
    },
    /// The in-flight request failed before any response arrived.
    TransportFailed {
        submission_id: crate::SubmissionId,
        message: String,
    },
    /// User abandoned the in-flight submission.
    CancelRequested,
}

use std::fmt;

pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Sending,
    Receiving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub submission_id: SubmissionId,
    pub stage: UploadStage,
    pub bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(UploadProgress),
    Settled {
        submission_id: SubmissionId,
        result: Result<RawResponse, TransportError>,
    },
}

/// A response that arrived, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportFailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailureKind {
    InvalidUrl,
    InvalidUpload,
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Cancelled,
    Network,
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailureKind::InvalidUrl => write!(f, "invalid url"),
            TransportFailureKind::InvalidUpload => write!(f, "invalid upload"),
            TransportFailureKind::Timeout => write!(f, "timeout"),
            TransportFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            TransportFailureKind::Cancelled => write!(f, "cancelled"),
            TransportFailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("engine worker stopped")]
    Stopped,
}

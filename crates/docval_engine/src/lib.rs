//! Docval engine: file loading, upload IO and effect execution.
mod decode;
mod engine;
mod load;
mod prompt;
mod settings;
mod types;
mod upload;

pub use decode::decode_body;
pub use engine::EngineHandle;
pub use load::{load_upload, mime_for_extension, LoadError, UploadFile, ACCEPTED_EXTENSIONS};
pub use prompt::{AdminCredentials, PromptClient, PromptError};
pub use settings::{
    endpoint_url, parse_base_url, ServiceSettings, PROMPT_ENDPOINT, VALIDATE_ENDPOINT,
};
pub use types::{
    EngineError, EngineEvent, RawResponse, SubmissionId, TransportError, TransportFailureKind,
    UploadProgress, UploadStage,
};
pub use upload::{ChannelProgressSink, ProgressSink, ReqwestUploader, Uploader, FILE_FIELD};

use std::error::Error as _;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

use crate::decode::decode_body;
use crate::settings::{ServiceSettings, VALIDATE_ENDPOINT};
use crate::{
    EngineEvent, RawResponse, SubmissionId, TransportError, TransportFailureKind, UploadFile,
    UploadProgress, UploadStage,
};

/// Multipart field the validation service reads the document from.
pub const FILE_FIELD: &str = "file";

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Send one document and return the response, whatever its status.
    async fn upload(
        &self,
        submission_id: SubmissionId,
        file: &UploadFile,
        sink: &dyn ProgressSink,
    ) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: ServiceSettings,
}

impl ReqwestUploader {
    pub fn new(settings: ServiceSettings) -> Self {
        Self { settings }
    }

    fn build_form(file: &UploadFile) -> Result<Form, TransportError> {
        let part = Part::stream_with_length(file.bytes.clone(), file.bytes.len() as u64)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|err| {
                TransportError::new(TransportFailureKind::InvalidUpload, error_chain(&err))
            })?;
        Ok(Form::new().part(FILE_FIELD, part))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(
        &self,
        submission_id: SubmissionId,
        file: &UploadFile,
        sink: &dyn ProgressSink,
    ) -> Result<RawResponse, TransportError> {
        let url = self.settings.endpoint(VALIDATE_ENDPOINT)?;
        let client = self.settings.build_client()?;
        let form = Self::build_form(file)?;

        sink.emit(EngineEvent::Progress(UploadProgress {
            submission_id,
            stage: UploadStage::Sending,
            bytes: Some(file.bytes.len() as u64),
        }));

        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = read_limited(
            response,
            self.settings.max_response_bytes,
            submission_id,
            sink,
        )
        .await?;

        Ok(RawResponse {
            status,
            body: decode_body(&bytes, content_type.as_deref()),
            content_type,
        })
    }
}

/// Read a whole response body, failing once it grows past `max_bytes`.
pub(crate) async fn read_limited(
    response: reqwest::Response,
    max_bytes: u64,
    submission_id: SubmissionId,
    sink: &dyn ProgressSink,
) -> Result<Vec<u8>, TransportError> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(TransportError::new(
                TransportFailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            ));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(TransportError::new(
                TransportFailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
        sink.emit(EngineEvent::Progress(UploadProgress {
            submission_id,
            stage: UploadStage::Receiving,
            bytes: Some(bytes.len() as u64),
        }));
    }
    Ok(bytes)
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportFailureKind::Timeout, "request timed out");
    }
    TransportError::new(TransportFailureKind::Network, error_chain(&err))
}

/// reqwest keeps the useful part ("connection refused") in the source chain.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

use std::time::Duration;

use docval_core::{Effect, Msg, UploadSelection};
use docval_engine::{EngineError, EngineEvent, EngineHandle, ServiceSettings, UploadFile};
use docval_logging::{docval_debug, docval_info, docval_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ServiceSettings) -> Result<Self, EngineError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit {
                    submission_id,
                    upload,
                } => {
                    let file = to_upload_file(&upload);
                    log_submit(submission_id, &file);
                    self.engine.submit(submission_id, file);
                }
                Effect::CancelSubmission { submission_id } => {
                    docval_info!("CancelSubmission submission_id={}", submission_id);
                    self.engine.cancel(submission_id);
                }
            }
        }
    }

    /// Wait up to `timeout` for the next engine event that the core cares about.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineError> {
        let Some(event) = self.engine.recv_timeout(timeout)? else {
            return Ok(None);
        };

        let msg = match event {
            EngineEvent::Progress(progress) => {
                docval_debug!(
                    "submission {} {:?} bytes={:?}",
                    progress.submission_id,
                    progress.stage,
                    progress.bytes
                );
                return Ok(None);
            }
            EngineEvent::Settled {
                submission_id,
                result: Ok(response),
            } => {
                docval_info!(
                    "submission {} answered status={} body_len={}",
                    submission_id,
                    response.status,
                    response.body.len()
                );
                Msg::ResponseReceived {
                    submission_id,
                    status: response.status,
                    body: response.body,
                }
            }
            EngineEvent::Settled {
                submission_id,
                result: Err(err),
            } => {
                docval_warn!(
                    "submission {} failed ({}): {}",
                    submission_id,
                    err.kind,
                    err.message
                );
                Msg::TransportFailed {
                    submission_id,
                    message: err.message,
                }
            }
        };
        Ok(Some(msg))
    }
}

pub fn to_upload_file(selection: &UploadSelection) -> UploadFile {
    UploadFile::new(
        selection.file_name.clone(),
        selection.mime_type.clone(),
        selection.bytes.clone(),
    )
}

pub fn to_selection(file: UploadFile) -> UploadSelection {
    UploadSelection::new(file.file_name, file.mime_type, file.bytes)
}

fn log_submit(submission_id: u64, file: &UploadFile) {
    // The digest is computed only when the line is emitted.
    if !log::log_enabled!(log::Level::Info) {
        return;
    }
    docval_info!(
        "Submit submission_id={} file={} bytes={} sha256={}",
        submission_id,
        file.file_name,
        file.bytes.len(),
        file.sha256_hex()
    );
}

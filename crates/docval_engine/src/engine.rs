use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use docval_logging::{docval_debug, docval_info};
use tokio_util::sync::CancellationToken;

use crate::settings::ServiceSettings;
use crate::upload::{ChannelProgressSink, ReqwestUploader, Uploader};
use crate::{
    EngineError, EngineEvent, SubmissionId, TransportError, TransportFailureKind, UploadFile,
};

enum EngineCommand {
    Submit {
        submission_id: SubmissionId,
        file: UploadFile,
    },
    Cancel {
        submission_id: SubmissionId,
    },
}

type InFlight = Arc<Mutex<HashMap<SubmissionId, CancellationToken>>>;

/// Runs uploads on a private tokio runtime and reports back over a channel.
///
/// Dropping the handle cancels every request still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    shutdown: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: ServiceSettings) -> Result<Self, EngineError> {
        Self::with_uploader(Arc::new(ReqwestUploader::new(settings)))
    }

    pub fn with_uploader(uploader: Arc<dyn Uploader>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let worker_shutdown = shutdown.clone();
        thread::Builder::new()
            .name("docval-engine".to_string())
            .spawn(move || {
                let in_flight: InFlight = Arc::default();
                while let Ok(command) = cmd_rx.recv() {
                    handle_command(
                        &runtime,
                        uploader.clone(),
                        command,
                        &in_flight,
                        &worker_shutdown,
                        event_tx.clone(),
                    );
                }
                worker_shutdown.cancel();
            })?;

        Ok(Self {
            cmd_tx,
            event_rx,
            shutdown,
        })
    }

    pub fn submit(&self, submission_id: SubmissionId, file: UploadFile) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            submission_id,
            file,
        });
    }

    pub fn cancel(&self, submission_id: SubmissionId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { submission_id });
    }

    /// Wait up to `timeout` for the next event. Fails once the worker is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Stopped),
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    uploader: Arc<dyn Uploader>,
    command: EngineCommand,
    in_flight: &InFlight,
    shutdown: &CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit {
            submission_id,
            file,
        } => {
            let token = shutdown.child_token();
            if let Ok(mut map) = in_flight.lock() {
                map.insert(submission_id, token.clone());
            }
            let in_flight = in_flight.clone();
            runtime.spawn(async move {
                let sink = ChannelProgressSink::new(event_tx.clone());
                let result: Result<_, TransportError> = tokio::select! {
                    _ = token.cancelled() => Err(TransportError::new(
                        TransportFailureKind::Cancelled,
                        "request cancelled",
                    )),
                    result = uploader.upload(submission_id, &file, &sink) => result,
                };
                if let Ok(mut map) = in_flight.lock() {
                    map.remove(&submission_id);
                }
                docval_debug!(
                    "submission {} settled ok={}",
                    submission_id,
                    result.is_ok()
                );
                let _ = event_tx.send(EngineEvent::Settled {
                    submission_id,
                    result,
                });
            });
        }
        EngineCommand::Cancel { submission_id } => {
            let token = in_flight
                .lock()
                .ok()
                .and_then(|mut map| map.remove(&submission_id));
            match token {
                Some(token) => {
                    docval_info!("cancelling submission {}", submission_id);
                    token.cancel();
                }
                None => docval_debug!("cancel for settled submission {}", submission_id),
            }
        }
    }
}

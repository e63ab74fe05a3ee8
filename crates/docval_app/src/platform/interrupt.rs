use std::sync::mpsc;
use std::thread;

use docval_logging::docval_warn;

/// Forward Ctrl-C presses to a channel instead of terminating the process,
/// so an in-flight submission can be cancelled cleanly.
pub fn spawn_interrupt_listener() -> Option<mpsc::Receiver<()>> {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("docval-interrupt".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    docval_warn!("Ctrl-C handling unavailable: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                while tokio::signal::ctrl_c().await.is_ok() {
                    if tx.send(()).is_err() {
                        break;
                    }
                }
            });
        });

    match spawned {
        Ok(_) => Some(rx),
        Err(err) => {
            docval_warn!("Ctrl-C handling unavailable: {}", err);
            None
        }
    }
}

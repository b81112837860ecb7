use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::orchestrator::Dispatcher;

/// Start the thread that runs submitted lines one at a time. Dropping the
/// returned sender, or closing the event queue, ends it.
pub(super) fn spawn_dispatcher(dispatcher: Dispatcher) -> (Sender<String>, JoinHandle<()>) {
    let (tx, rx) = unbounded::<String>();
    let handle = thread::spawn(move || run_submissions(dispatcher, rx));
    (tx, handle)
}

fn run_submissions(mut dispatcher: Dispatcher, rx: Receiver<String>) {
    tracing::info!(
        backend = dispatcher.backend_name().unwrap_or("none"),
        "submission worker started"
    );
    for line in rx {
        if dispatcher.process(&line).is_err() {
            tracing::debug!("event queue closed; submission worker exiting");
            return;
        }
    }
    tracing::debug!("submission channel closed; submission worker exiting");
}

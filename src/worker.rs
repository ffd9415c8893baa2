use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::dead_letter::DeadLetter;
use crate::sinks::{SinkOutcome, SinkRegistry, SubmissionSink};
use crate::submission::Submission;

/// Hands submissions to the background worker without waiting on it.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Submission>,
}

impl Dispatcher {
    /// Returns false if the worker has already shut down.
    pub fn submit(&self, submission: Submission) -> bool {
        self.tx.send(submission).is_ok()
    }
}

pub struct WorkerHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Stop taking new submissions and wait up to `grace` for queued and
    /// in-flight writes to finish.
    pub async fn shutdown(self, grace: Duration) {
        let _ = self.shutdown.send(true);

        match tokio::time::timeout(grace, self.join).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Persistence worker panicked: {e}"),
            Err(_) => tracing::warn!(
                "Persistence worker did not drain within {}s; pending writes are dropped",
                grace.as_secs()
            ),
        }
    }
}

/// Start the persistence worker on the current runtime.
pub fn spawn(sinks: Arc<SinkRegistry>, dead_letter: Arc<DeadLetter>) -> (Dispatcher, WorkerHandle) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let join = tokio::spawn(run(rx, sinks, dead_letter, shutdown_rx));

    (
        Dispatcher { tx },
        WorkerHandle {
            shutdown: shutdown_tx,
            join,
        },
    )
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<Submission>,
    sinks: Arc<SinkRegistry>,
    dead_letter: Arc<DeadLetter>,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::debug!("Persistence worker started ({} sinks)", sinks.list().len());

    let mut in_flight = JoinSet::new();
    let mut shutdown_open = true;

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(submission) => {
                    in_flight.spawn(persist(submission, sinks.clone(), dead_letter.clone()));
                }
                None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => log_join(joined),
            stopped = async { shutdown.wait_for(|stop| *stop).await.is_ok() }, if shutdown_open => {
                if stopped {
                    break;
                }
                // Handle dropped without a shutdown: keep going until the channel closes.
                shutdown_open = false;
            }
        }
    }

    rx.close();
    while let Ok(submission) = rx.try_recv() {
        in_flight.spawn(persist(submission, sinks.clone(), dead_letter.clone()));
    }

    if !in_flight.is_empty() {
        tracing::info!("Waiting for {} pending submission writes", in_flight.len());
    }
    while let Some(joined) = in_flight.join_next().await {
        log_join(joined);
    }

    tracing::debug!("Persistence worker stopped");
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        tracing::error!("Persistence task failed: {e}");
    }
}

/// Run every sink for one submission. Sinks are independent: one failing
/// neither stops nor orders the others.
async fn persist(submission: Submission, sinks: Arc<SinkRegistry>, dead_letter: Arc<DeadLetter>) {
    join_all(
        sinks
            .list()
            .iter()
            .map(|sink| persist_one(sink.as_ref(), &submission, &dead_letter)),
    )
    .await;
}

async fn persist_one(sink: &dyn SubmissionSink, submission: &Submission, dead_letter: &DeadLetter) {
    match sink.persist(submission).await {
        Ok(SinkOutcome::Stored(detail)) => {
            tracing::info!("Submission {} saved to {}: {detail}", submission.id, sink.id());
        }
        Ok(SinkOutcome::Skipped(reason)) => {
            tracing::debug!("Submission {} not saved to {}: {reason}", submission.id, sink.id());
        }
        Err(e) => {
            tracing::error!("Error saving submission {} to {}: {e}", submission.id, sink.id());
            dead_letter.record(sink.id(), submission, &e.message).await;
        }
    }
}
